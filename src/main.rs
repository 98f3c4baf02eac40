use clap::{Parser, Subcommand};
use docrag::Result;
use docrag::commands::{index, query};

#[derive(Debug, Parser)]
#[command(name = "docrag")]
#[command(about = "Index local documents and answer questions about them with a local LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Index all documents in the repository directory
    Index,
    /// Ask a question about the indexed documents
    Query {
        /// The question to answer
        #[arg(required = true)]
        question: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index => {
            index().await?;
        }
        Commands::Query { question } => {
            query(&question.join(" ")).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["docrag", "index"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert!(matches!(parsed.command, Commands::Index));
        }
    }

    #[test]
    fn query_joins_words() {
        let cli = Cli::try_parse_from(["docrag", "query", "what", "is", "this?"])
            .expect("valid invocation");

        match cli.command {
            Commands::Query { question } => {
                assert_eq!(question.join(" "), "what is this?");
            }
            Commands::Index => panic!("expected query command"),
        }
    }

    #[test]
    fn query_requires_a_question() {
        let err = Cli::try_parse_from(["docrag", "query"]).expect_err("missing question");
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn missing_subcommand_shows_help() {
        // A required subcommand derive turns a bare invocation into the
        // help-on-missing error, not MissingSubcommand.
        let err = Cli::try_parse_from(["docrag"]).expect_err("missing subcommand");
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand,
            "unexpected error: {err}"
        );
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        let err = Cli::try_parse_from(["docrag", "reindex"]).expect_err("unknown subcommand");
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }
}
