use chip8_rewind::cli;
use log::error;

fn main() {
    let cli = cli::init();
    let result = match cli.command {
        cli::Commands::Run(args) => cli::run(args),
        cli::Commands::Disassemble { path, output_file } => cli::disassemble(&path, output_file),
    };
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
