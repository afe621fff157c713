use sectxt::app::App;
use sectxt::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::from_args();
    let code = match App::run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            if cli.error_enabled() {
                eprintln!("Error: {e}");
            }
            e.exit_code()
        }
    };
    std::process::exit(code);
}
