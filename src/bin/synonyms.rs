//! Synonym table from the command line.
//!
//! ```text
//! synonyms                      # built-in word list
//! synonyms run walk --user kim  # look up and save for "kim"
//! synonyms --user kim --show-saved
//! ```

use anyhow::{bail, Context as _};
use clap::Parser;

use passage_quiz::{
    config::AppConfig,
    llm::{render_table, ApiClient},
    quiz::{get_synonyms, DEFAULT_WORDS},
    store::UserData,
};

#[derive(Parser, Debug)]
#[command(name = "synonyms", about = "Print three synonyms and the Korean meaning per word")]
struct Args {
    /// Words to look up (defaults to a built-in list of ten adjectives)
    words: Vec<String>,

    /// Save the words and rows for this user
    #[arg(short, long)]
    user: Option<String>,

    /// Print the rows saved for --user instead of calling the API
    #[arg(long, requires = "user")]
    show_saved: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = AppConfig::load()
        .context("failed to load settings.toml")?
        .with_env();
    let store = UserData::from_config(&config.storage);

    let user = args
        .user
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    if args.show_saved {
        let Some(user) = user else {
            bail!("--show-saved needs a non-empty --user");
        };
        let rows = store.get_results(user)?;
        print!("{}", render_table(&rows));
        return Ok(());
    }

    let words: Vec<String> = if args.words.is_empty() {
        DEFAULT_WORDS.iter().map(|w| w.to_string()).collect()
    } else {
        args.words
    };

    let client = ApiClient::from_config(&config.llm);
    let rows = get_synonyms(&client, &words).await?;
    print!("{}", render_table(&rows));

    if let Some(user) = user {
        for word in &words {
            store.save_word(user, word)?;
        }
        store.save_results(user, &rows)?;
        log::info!("saved {} word(s) and {} row(s) for {user}", words.len(), rows.len());
    }

    Ok(())
}
