use std::io;

fn main() {
    let code = pokerroom_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
