use clap::Parser;
use log::LevelFilter;
use pathviz_core::MAX_GRID_DIM;
use pathviz_search::AlgorithmKind;
use pathviz_sim::{MAX_SPEED, MIN_SPEED, SimConfig};

/// Interactive grid pathfinding visualizer.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Grid width in cells.
    #[arg(
        long,
        default_value_t = 20,
        value_parser = clap::value_parser!(i32).range(1..=i64::from(MAX_GRID_DIM))
    )]
    pub width: i32,

    /// Grid height in cells.
    #[arg(
        long,
        default_value_t = 12,
        value_parser = clap::value_parser!(i32).range(1..=i64::from(MAX_GRID_DIM))
    )]
    pub height: i32,

    /// Search steps per second.
    #[arg(
        long,
        default_value_t = MIN_SPEED,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_SPEED)..=i64::from(MAX_SPEED))
    )]
    pub speed: u32,

    /// Algorithm selected at startup: dijkstra, astar, bfs or dfs.
    #[arg(long, default_value = "dijkstra")]
    pub algorithm: AlgorithmKind,

    /// Seed for the scatter command; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the exploration while a search runs.
    #[arg(long, default_value_t = false)]
    pub no_draw: bool,

    /// Most verbose level shown in the message log.
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            speed: self.speed,
            draw: !self.no_draw,
            algorithm: self.algorithm,
            ..SimConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["pathviz"]).unwrap();
        assert_eq!((args.width, args.height), (20, 12));
        assert_eq!(args.algorithm, AlgorithmKind::Dijkstra);
        assert_eq!(args.log_level, LevelFilter::Info);
        let config = args.sim_config();
        assert_eq!(config.speed, 1);
        assert!(config.draw);
    }

    #[test]
    fn parses_every_option() {
        let args = Args::try_parse_from([
            "pathviz",
            "--width",
            "40",
            "--height",
            "9",
            "--speed",
            "25",
            "--algorithm",
            "a*",
            "--seed",
            "3",
            "--no-draw",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!((args.width, args.height), (40, 9));
        assert_eq!(args.algorithm, AlgorithmKind::AStar);
        assert_eq!(args.seed, Some(3));
        assert_eq!(args.log_level, LevelFilter::Debug);
        let config = args.sim_config();
        assert_eq!(config.speed, 25);
        assert!(!config.draw);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Args::try_parse_from(["pathviz", "--width", "0"]).is_err());
        assert!(Args::try_parse_from(["pathviz", "--height", "101"]).is_err());
        assert!(Args::try_parse_from(["pathviz", "--speed", "500"]).is_err());
        assert!(Args::try_parse_from(["pathviz", "--algorithm", "greedy"]).is_err());
    }
}
