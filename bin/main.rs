mod opt;
mod routes;

use clap::Parser;
use opt::{Command, Opt};

fn route_cmd(opt: Opt) -> i32 {
    match opt.cmd {
        Command::Classes(cmd) => routes::classes(cmd),
        Command::Query(cmd) => routes::query(cmd),
        Command::Prosody(cmd) => routes::prosody(cmd),
        Command::Ngrams(cmd) => routes::ngrams(cmd),
        Command::Simulate(cmd) => routes::simulate(cmd),
        Command::Compare(cmd) => routes::compare(cmd),
    }
}

fn main() {
    env_logger::init();

    let opt = Opt::parse();

    let exit_code = route_cmd(opt);

    std::process::exit(exit_code);
}
