mod commands;
mod encoding;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stash_core::constants::DEFAULT_LISTEN_ADDRESS;

#[derive(Parser)]
#[command(
    name = "stash",
    about = "Command line client for the stash daemon, a content-addressed \
             deterministically encrypted blob store"
)]
struct Cli {
    /// Address the daemon is listening on, as a URL with the network
    /// scheme, e.g. tcp://localhost:53431 or unix:///tmp/stash.sock
    #[arg(short, long, global = true, default_value = DEFAULT_LISTEN_ADDRESS)]
    address: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt data from stdin, store it, and print the reference JSON
    Put {
        /// Salt for encryption, base64 if it decodes, raw bytes otherwise
        #[arg(short, long)]
        salt: Option<String>,
    },

    /// Fetch and decrypt a blob; reference JSON on stdin, or ADDRESS with --key
    Get {
        /// Address of the blob as a base64-encoded string
        blob_address: Option<String>,

        /// Secret key to decrypt with, base64-encoded
        #[arg(short, long)]
        key: Option<String>,

        /// Salt the data was encrypted with
        #[arg(short, long)]
        salt: Option<String>,
    },

    /// Encrypt data from stdin and print its reference without storing
    Ref {
        /// Salt for encryption, base64 if it decodes, raw bytes otherwise
        #[arg(short, long)]
        salt: Option<String>,
    },

    /// Encrypt data from stdin and write the ciphertext to stdout
    Encrypt {
        /// Salt for encryption, base64 if it decodes, raw bytes otherwise
        #[arg(short, long)]
        salt: Option<String>,
    },

    /// Decrypt ciphertext from stdin and write the plaintext to stdout
    Decrypt {
        /// Secret key to decrypt with, base64-encoded
        #[arg(short, long)]
        key: String,

        /// Salt the data was encrypted with
        #[arg(short, long)]
        salt: Option<String>,
    },

    /// Push (presumably encrypted) bytes from stdin straight into the store
    Insert,

    /// Write the raw ciphertext at an address to stdout
    Cat {
        /// Address of the blob as a base64-encoded string; reference
        /// JSON is read from stdin if omitted
        blob_address: Option<String>,
    },

    /// Print existence and size of the blob at an address
    Stat {
        /// Address of the blob as a base64-encoded string; reference
        /// JSON is read from stdin if omitted
        blob_address: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let address = cli.address;

    let result = match cli.command {
        Commands::Put { salt } => commands::put::run_put(&address, salt.as_deref()).await,
        Commands::Get {
            blob_address,
            key,
            salt,
        } => {
            commands::get::run_get(
                &address,
                blob_address.as_deref(),
                key.as_deref(),
                salt.as_deref(),
            )
            .await
        }
        Commands::Ref { salt } => commands::reference::run_ref(&address, salt.as_deref()).await,
        Commands::Encrypt { salt } => {
            commands::encrypt::run_encrypt(&address, salt.as_deref()).await
        }
        Commands::Decrypt { key, salt } => {
            commands::decrypt::run_decrypt(&address, &key, salt.as_deref()).await
        }
        Commands::Insert => commands::insert::run_insert(&address).await,
        Commands::Cat { blob_address } => {
            commands::cat::run_cat(&address, blob_address.as_deref()).await
        }
        Commands::Stat { blob_address } => {
            commands::stat::run_stat(&address, blob_address.as_deref()).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
