//! Print the Argon2 hash of a password for `bootstrap_admin.password_hash`
//!
//! Usage:
//!   propdesk-hash 'correct horse battery'
//!   echo 'correct horse battery' | propdesk-hash

use clap::Parser;
use std::io::{self, BufRead};
use std::process::ExitCode;

use propdesk_lib::services::users::hash_password;

#[derive(Parser)]
#[command(name = "propdesk-hash", version, about = "Hash a password for the PropDesk config")]
struct Cli {
    /// Password to hash. Read from stdin when omitted.
    password: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let password = match cli.password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            if let Err(e) = io::stdin().lock().read_line(&mut line) {
                eprintln!("Error: failed to read password: {}", e);
                return ExitCode::FAILURE;
            }
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        eprintln!("Error: password must not be empty");
        return ExitCode::FAILURE;
    }

    match hash_password(&password) {
        Ok(hash) => {
            println!("{}", hash);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
