use log::error;
use selset::command::{self, CommandError};
use std::{env, process};

fn main() {
    env_logger::init();

    let command = command::Command::new();

    match command.run(env::args()) {
        Ok(output) => {
            print!("{}", output)
        }
        Err(CommandError::Arguments(err)) => err.exit(),
        Err(err) => {
            error!("{:?}", err);
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };
}
