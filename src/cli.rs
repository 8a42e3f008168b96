use crate::queue::OverflowPolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Queue Pair Demo - drive a bounded FIFO queue session end to end
#[derive(Parser, Debug, Clone)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// Total queue capacity in bytes
    #[clap(short = 'c', long, default_value_t = crate::defaults::CAPACITY)]
    pub capacity: usize,

    /// Number of messages the writer appends
    #[clap(short = 'n', long, default_value_t = crate::defaults::MESSAGE_COUNT)]
    pub messages: usize,

    /// Payload size of each written message in bytes
    #[clap(short = 's', long, default_value_t = crate::defaults::PAYLOAD_SIZE)]
    pub payload_size: usize,

    /// What to do when a write arrives against a full queue
    #[clap(short = 'p', long, value_enum, default_value_t = PolicyArg::ClearBacklog)]
    pub policy: PolicyArg,

    /// Output file for the run summary (JSON format); stdout if omitted
    #[clap(short = 'o', long)]
    pub output_file: Option<PathBuf>,

    /// Verbose output
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

/// CLI spelling of the overflow policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Destructively clear the backlog before admitting the write
    #[clap(name = "clear-backlog")]
    ClearBacklog,

    /// Keep the backlog and accept zero bytes of the write
    #[clap(name = "reject-newest")]
    RejectNewest,
}

impl From<PolicyArg> for OverflowPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::ClearBacklog => OverflowPolicy::ClearBacklog,
            PolicyArg::RejectNewest => OverflowPolicy::RejectNewest,
        }
    }
}

impl std::fmt::Display for PolicyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyArg::ClearBacklog => write!(f, "clear-backlog"),
            PolicyArg::RejectNewest => write!(f, "reject-newest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_crate_defaults() {
        let args = Args::parse_from(["queue-pair-demo"]);
        assert_eq!(args.capacity, 1024);
        assert_eq!(args.policy, PolicyArg::ClearBacklog);
        assert!(args.output_file.is_none());
    }

    #[test]
    fn test_policy_round_trips_through_value_enum() {
        let args = Args::parse_from(["queue-pair-demo", "--policy", "reject-newest"]);
        assert_eq!(OverflowPolicy::from(args.policy), OverflowPolicy::RejectNewest);
    }
}
