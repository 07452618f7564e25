use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "job-tracker", about = "Job application tracking API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run migrations and start the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Print a signed bearer token for a user
    Token {
        /// User id placed in the token subject
        #[arg(long)]
        user: String,
        /// Mark the caller as a read-only demo user
        #[arg(long)]
        test_user: bool,
    },
}

impl Cli {
    pub fn command(self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["job-tracker"]).unwrap();
        assert_eq!(cli.command(), Command::Serve);
    }

    #[test]
    fn parses_token_arguments() {
        let cli = Cli::try_parse_from(["job-tracker", "token", "--user", "alice", "--test-user"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Token {
                user: "alice".to_string(),
                test_user: true
            }
        );
    }
}
