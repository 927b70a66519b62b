//! stempeluhr main entrypoint.

use stempeluhr::run;
use stempeluhr::ui::messages;

fn main() {
    println!();
    if let Err(e) = run() {
        messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
