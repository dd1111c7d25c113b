use std::env;

use movelead::init;
use movelead::terminal::output::{self, OutputPreferences};
use movelead::terminal::{run_terminal, WizardExit};

#[tokio::main]
async fn main() {
    init();

    if env::args().skip(1).any(|arg| arg == "--plain") {
        output::set_preferences(OutputPreferences {
            plain_mode: true,
            quiet_mode: false,
        });
    }

    match run_terminal().await {
        Ok(WizardExit::Submitted { confirmation }) => {
            println!("Confirmation page: {confirmation}");
        }
        Ok(WizardExit::Abandoned) => println!("No request was sent."),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
