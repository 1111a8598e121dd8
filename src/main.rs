pub mod cli;
pub mod model;
pub mod synth;
pub mod validate;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
