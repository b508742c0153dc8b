//! Per-generation reports and where they are written.
//!
//! A [`GenerationReport`] is recorded to a [`ReportSink`] after each ranking.
//! Sinks are append-only; nothing reads reports back.

use std::{
    fmt,
    io::{self, Write},
};

use chrono::{DateTime, Utc};
use evotris_evaluator::{board_feature::BoardFeature, weights::Weights};

use crate::genetic::{Agent, Population, WeightSpread};

/// Snapshot of one ranked agent.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AgentSummary {
    pub weights: Weights,
    pub rows_completed: usize,
    pub turns_played: usize,
    pub games_played: usize,
    pub average_rows: f64,
}

impl From<&Agent> for AgentSummary {
    fn from(agent: &Agent) -> Self {
        Self {
            weights: *agent.weights(),
            rows_completed: agent.rows_completed(),
            turns_played: agent.turns_played(),
            games_played: agent.games_played(),
            average_rows: agent.average_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GenerationReport {
    /// Zero-based generation index
    pub generation: usize,
    pub timestamp: DateTime<Utc>,
    /// Turn cap the generation's games were played with
    pub turn_cap: usize,
    /// Mean rows cleared per game over the whole population
    pub population_average: f64,
    /// Mean rows cleared per game over [`Self::top`]
    pub top_average: f64,
    /// Fittest agents, best first
    pub top: Vec<AgentSummary>,
    /// Games that failed and were left out of the totals
    pub failed_tasks: usize,
    /// Spread of each weight, in [`BoardFeature::ALL`] order
    pub weight_spread: Vec<WeightSpread>,
}

impl GenerationReport {
    /// Summarizes a ranked population.
    #[must_use]
    pub fn from_population(
        generation: usize,
        turn_cap: usize,
        population: &Population,
        top_k: usize,
        failed_tasks: usize,
    ) -> Self {
        Self {
            generation,
            timestamp: Utc::now(),
            turn_cap,
            population_average: population.average_rows(),
            top_average: population.top_average_rows(top_k),
            top: population.top(top_k).map(AgentSummary::from).collect(),
            failed_tasks,
            weight_spread: population.weight_spread(),
        }
    }

    #[must_use]
    pub fn best(&self) -> Option<&AgentSummary> {
        self.top.first()
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "generation {} [{}] turn cap {}",
            self.generation,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.turn_cap
        )?;
        writeln!(
            f,
            "  average rows: population {:.2}, top {} {:.2}",
            self.population_average,
            self.top.len(),
            self.top_average
        )?;
        if self.failed_tasks > 0 {
            writeln!(f, "  failed games: {}", self.failed_tasks)?;
        }
        for (rank, agent) in self.top.iter().enumerate() {
            writeln!(
                f,
                "  #{:<2} rows {:>7} turns {:>8} games {:>3} avg {:>9.2}  {}",
                rank + 1,
                agent.rows_completed,
                agent.turns_played,
                agent.games_played,
                agent.average_rows,
                agent.weights
            )?;
        }
        for (feature, spread) in BoardFeature::ALL.iter().zip(&self.weight_spread) {
            writeln!(
                f,
                "  {:<18} min {:>8.4} mean {:>8.4} max {:>8.4}",
                feature.id(),
                spread.min,
                spread.mean,
                spread.max
            )?;
        }
        Ok(())
    }
}

/// Destination of generation reports.
pub trait ReportSink {
    fn record(&mut self, report: &GenerationReport) -> io::Result<()>;
}

impl<S> ReportSink for &mut S
where
    S: ReportSink + ?Sized,
{
    fn record(&mut self, report: &GenerationReport) -> io::Result<()> {
        (**self).record(report)
    }
}

/// Keeps reports in memory.
impl ReportSink for Vec<GenerationReport> {
    fn record(&mut self, report: &GenerationReport) -> io::Result<()> {
        self.push(report.clone());
        Ok(())
    }
}

/// Writes the human-readable form of each report, flushing after each one.
#[derive(Debug)]
pub struct TextSink<W> {
    writer: W,
}

impl<W> TextSink<W>
where
    W: Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> ReportSink for TextSink<W>
where
    W: Write,
{
    fn record(&mut self, report: &GenerationReport) -> io::Result<()> {
        write!(self.writer, "{report}")?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use evotris_evaluator::game_task::GameOutcome;

    use super::*;

    fn ranked_population() -> Population {
        let mut agents = vec![];
        for (rows, weights) in [
            (3, Weights::only(BoardFeature::Holes, -1.0)),
            (9, Weights::DEFAULT),
            (0, Weights::only(BoardFeature::WellDepth, -1.0)),
        ] {
            let mut agent = Agent::new(weights);
            agent.record(GameOutcome {
                rows_cleared: rows,
                turns_played: 10,
            });
            agents.push(agent);
        }
        let mut population = Population::new(agents);
        population.rank();
        population
    }

    #[test]
    fn test_report_lists_top_agents_best_first() {
        let report = GenerationReport::from_population(4, 500, &ranked_population(), 2, 1);
        assert_eq!(report.generation, 4);
        assert_eq!(report.top.len(), 2);
        assert_eq!(report.best().unwrap().rows_completed, 9);
        assert_eq!(report.best().unwrap().weights, Weights::DEFAULT);
        assert_eq!(report.top[1].rows_completed, 3);
        assert!((report.top_average - 6.0).abs() < 1e-12);
        assert!((report.population_average - 4.0).abs() < 1e-12);
        assert_eq!(report.weight_spread.len(), BoardFeature::LEN);
    }

    #[test]
    fn test_text_sink_writes_report() {
        let report = GenerationReport::from_population(0, 250, &ranked_population(), 3, 2);
        let mut sink = TextSink::new(Vec::new());
        sink.record(&report).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("generation 0 ["));
        assert!(text.contains("turn cap 250"));
        assert!(text.contains("failed games: 2"));
        assert!(text.contains("#1 "));
        assert!(text.contains("#3 "));
        assert!(text.contains(&Weights::DEFAULT.to_string()));
        assert!(text.contains("holes"));
    }

    #[test]
    fn test_vec_sink_keeps_reports() {
        let report = GenerationReport::from_population(1, 500, &ranked_population(), 1, 0);
        fn record_twice<S: ReportSink>(mut sink: S, report: &GenerationReport) {
            sink.record(report).unwrap();
            sink.record(report).unwrap();
        }

        let mut reports: Vec<GenerationReport> = vec![];
        record_twice(&mut reports, &report);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], report);
    }
}
