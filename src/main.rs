use clap::Parser;
use microtask::cli::commands::Cli;
use microtask::cli::handlers;

fn main() {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(handlers::dispatch(cli)) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
