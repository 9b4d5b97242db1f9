//! A simple CLI tool for verifying a ballot dump.
//! This uses the server's own verification implementation, and is by definition
//! compatible with the output of `GET /ballot/dump`.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;

use idvote_backend::model::ballot::{BallotDump, VerificationError};

const PROGRAM_NAME: &str = "verify-ballot";

const ABOUT_TEXT: &str = "Verify the internal consistency of a ballot dump.

EXIT CODES:
     0: Verification succeeded.
   255: Ran successfully, but verification failed.
 Other: Error.";

const DUMP_PATH: &str = "DUMP_PATH";

const DUMP_PATH_HELP: &str = "The path to a JSON dump of the ballot,\n\
as returned by `GET /ballot/dump`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME).about(ABOUT_TEXT).arg(
        Arg::new(DUMP_PATH)
            .help(DUMP_PATH_HELP)
            .action(ArgAction::Set)
            .required(true),
    )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON dump.
    Format(String),
    /// Verification failed due to the contained reason.
    Verification(VerificationError),
}

/// One line of the final report.
#[derive(Debug, Eq, PartialEq)]
struct FriendlyResults {
    pub candidate: String,
    pub votes: u64,
}

impl Display for FriendlyResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vote{}",
            self.candidate,
            self.votes,
            if self.votes != 1 { "s" } else { "" }
        )
    }
}

/// Run verification.
fn verify(path: &str) -> Result<Vec<FriendlyResults>, Error> {
    // Load the file.
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let dump: BallotDump =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;

    // Run verification.
    dump.verify().map_err(Error::Verification)?;

    // Turn into a list ordered by votes, then name.
    let mut results = dump
        .tally
        .into_iter()
        .map(|total| FriendlyResults {
            candidate: total.candidate,
            votes: total.votes,
        })
        .collect::<Vec<_>>();
    results.sort_unstable_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then_with(|| a.candidate.cmp(&b.candidate))
    });

    Ok(results)
}

/// Run verification, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(DUMP_PATH).unwrap(); // Required argument is guaranteed to be present.
    match verify(path) {
        Ok(friendly_results) => {
            println!("Verification succeeded.");
            for result in friendly_results {
                println!("{}", result);
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {}", msg);
            1
        }
        Err(Error::Verification(err)) => {
            let msg = match err {
                VerificationError::NoCandidates => String::from("The ballot has no candidates."),
                VerificationError::DuplicateCandidate(candidate) => {
                    format!("Candidate {} is listed more than once.", candidate)
                }
                VerificationError::UnknownCandidate(candidate) => {
                    format!("The tally counts votes for unknown candidate {}.", candidate)
                }
                VerificationError::MissingTally(candidate) => {
                    format!("Candidate {} does not have exactly one tally.", candidate)
                }
                VerificationError::DuplicateVoter(address) => {
                    format!("Voter {} is recorded more than once.", address)
                }
                VerificationError::TotalMismatch { tallied, voters } => format!(
                    "The tallies add up to {} but {} voters are recorded.",
                    tallied, voters
                ),
            };
            println!("Verification failed: {}", msg);
            255
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}
