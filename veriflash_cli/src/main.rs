use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use veriflash_core::*;

#[derive(Parser)]
#[command(name = "veriflash")]
#[command(about = "Flashcard drills: spot the right answer, then recall it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Seed the random draws (for reproducible sessions)
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge words as right or wrong for their category (default)
    Quiz,

    /// Type every right answer of one category from memory
    Recall {
        /// Category id or title
        #[arg(long)]
        category: String,
    },

    /// Show all categories and their words
    List,

    /// Add a category with two placeholder words
    AddCategory { title: String },

    /// Rename a category
    RenameCategory { category: String, title: String },

    /// Delete a category and its words
    RemoveCategory { category: String },

    /// Add a (wrong) word to a category
    AddWord { category: String, text: String },

    /// Change the text of a word
    RenameWord {
        category: String,
        word: String,
        text: String,
    },

    /// Mark a word as the category's right answer
    SetCorrect { category: String, word: String },

    /// Delete a word from a category
    RemoveWord { category: String, word: String },

    /// Write a dated JSON backup of the catalog
    Export {
        /// Directory to write the backup into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Replace the catalog with a JSON backup
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log = veriflash_core::logging::init_with_level("warn");
    let mut config = Config::load()?;
    veriflash_core::logging::set_default_level(&log, &config.log.level);

    if let Some(dir) = cli.data_dir {
        config.data.data_dir = dir;
    }
    let catalog_path = config.catalog_path();
    let seed = cli.seed.or(config.session.seed);

    match cli.command.unwrap_or(Commands::Quiz) {
        Commands::Quiz => cmd_quiz(&catalog_path, seed),
        Commands::Recall { category } => cmd_recall(&catalog_path, &category, seed),
        Commands::List => cmd_list(&catalog_path),
        Commands::AddCategory { title } => {
            let id = update_catalog(&catalog_path, |c| Ok(c.add_category(&title)))?;
            println!("✓ Added category '{}' ({})", title, id);
            Ok(())
        }
        Commands::RenameCategory { category, title } => {
            update_catalog(&catalog_path, |c| c.rename_category(&category, &title))?;
            println!("✓ Renamed '{}' to '{}'", category, title);
            Ok(())
        }
        Commands::RemoveCategory { category } => {
            let removed = update_catalog(&catalog_path, |c| c.remove_category(&category))?;
            println!("✓ Removed category '{}'", removed.title);
            Ok(())
        }
        Commands::AddWord { category, text } => {
            update_catalog(&catalog_path, |c| c.add_word(&category, &text))?;
            println!("✓ Added '{}' to '{}'", text, category);
            Ok(())
        }
        Commands::RenameWord {
            category,
            word,
            text,
        } => {
            update_catalog(&catalog_path, |c| c.update_word_text(&category, &word, &text))?;
            println!("✓ Renamed '{}' to '{}'", word, text);
            Ok(())
        }
        Commands::SetCorrect { category, word } => {
            update_catalog(&catalog_path, |c| c.set_correct_word(&category, &word))?;
            println!("✓ '{}' is now the right answer for '{}'", word, category);
            Ok(())
        }
        Commands::RemoveWord { category, word } => {
            let removed = update_catalog(&catalog_path, |c| c.remove_word(&category, &word))?;
            println!("✓ Removed '{}' from '{}'", removed.text, category);
            Ok(())
        }
        Commands::Export { dir } => {
            let catalog = load_catalog(&catalog_path)?;
            let today = chrono::Local::now().date_naive();
            let path = export_catalog(&catalog, &dir, today)?;
            println!("✓ Saved backup to {}", path.display());
            Ok(())
        }
        Commands::Import { file } => {
            let catalog = import_catalog(&file)?;
            // An unreadable working catalog is copied aside before replacement
            load_catalog(&catalog_path)?;
            save_catalog(&catalog, &catalog_path)?;
            println!("✓ Loaded {} categories", catalog.categories.len());
            Ok(())
        }
    }
}

/// Read one trimmed line from stdin; `None` on end of input
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
}

fn report_validation(catalog: &Catalog) {
    for error in catalog.validate() {
        tracing::warn!("Catalog: {}", error);
    }
}

fn cmd_quiz(catalog_path: &Path, seed: Option<u64>) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    report_validation(&catalog);

    let deck = Deck::build(&catalog);
    if deck.is_empty() {
        println!("Not enough data");
        println!("Add categories and words first (veriflash add-category).");
        return Ok(());
    }

    let mut session = BinaryQuizSession::start(deck, seed);

    loop {
        let view = session.view();
        match view.state {
            QuizState::Playing => {
                display_card(&view);
                let Some(line) = read_line("[y] correct  [n] incorrect  [q] quit > ")? else {
                    return Ok(());
                };
                match line.trim().to_lowercase().as_str() {
                    "y" | "c" => {
                        session.guess(true);
                    }
                    "n" | "i" => {
                        session.guess(false);
                    }
                    "q" => return Ok(()),
                    _ => println!("Answer 'y' or 'n'."),
                }
            }
            QuizState::Feedback => {
                display_feedback(&view);
                let Some(line) = read_line("Press Enter for the next card > ")? else {
                    return Ok(());
                };
                if line.trim().eq_ignore_ascii_case("q") {
                    return Ok(());
                }
                session.advance();
            }
            QuizState::Finished => {
                display_summary(&view);
                let line = read_line("'r' + Enter to start over, Enter to exit > ")?;
                match line {
                    Some(l) if l.trim().eq_ignore_ascii_case("r") => session.restart(),
                    _ => return Ok(()),
                }
            }
        }
    }
}

fn display_card(view: &QuizView) {
    let Some(card) = &view.current else {
        return;
    };
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  Score {} / {}   Streak {}", view.stats.correct, view.stats.total, view.stats.streak);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Category: {}", card.category_title);
    println!("  {}", card.word_text);
    println!();
    println!("  Cards remaining: {} / {}", view.remaining, view.deck_size);
}

fn display_feedback(view: &QuizView) {
    match view.last_judgement {
        Some(Judgement::Correct) => println!("\n  ✓ Correct!"),
        _ => println!("\n  ✗ Oops!"),
    }
    if let Some(answer) = &view.answer {
        println!("  The correct answer is {}", answer);
    }
}

fn display_summary(view: &QuizView) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  Session Complete!");
    println!("╰─────────────────────────────────────────╯");
    println!("  You have reviewed all available cards.");
    println!("  Score: {}%", view.stats.percentage());
    println!("  Streak: {}", view.stats.streak);
}

fn cmd_recall(catalog_path: &Path, category: &str, seed: Option<u64>) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let category = catalog
        .find_category(category)
        .ok_or_else(|| Error::UnknownCategory(category.to_string()))?;

    if !recallable_categories(&catalog)
        .iter()
        .any(|c| c.id == category.id)
    {
        return Err(Error::CatalogValidation(format!(
            "Category '{}' has no correct word to recall",
            category.title
        )));
    }

    let mut session = RecallSession::start(category.clone(), seed);
    println!(
        "\n  {}: type the {} right answer(s). '?' for a hint, 'q' to quit.",
        session.category().title,
        session.answer_count()
    );

    while !session.is_complete() {
        let Some(line) = read_line("> ")? else {
            break;
        };
        match line.trim() {
            "q" => break,
            "?" => match session.hint() {
                Some(text) => println!("  Maybe... {}?", text),
                None => println!("  No hints left."),
            },
            _ => match session.submit(&line) {
                RecallOutcome::Found(_) => println!(
                    "  ✓ {} / {} found",
                    session.found().len(),
                    session.answer_count()
                ),
                RecallOutcome::NoMatch => println!("  ✗ Not an answer"),
            },
        }
    }

    if session.is_complete() {
        println!("\n✓ All answers recalled: {}", session.found_words().join(", "));
    }
    Ok(())
}

fn cmd_list(catalog_path: &Path) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;

    if catalog.is_empty() {
        println!("No categories yet.");
    }
    for category in &catalog.categories {
        println!("{}  ({})", category.title, category.id);
        for word in &category.words {
            let mark = if word.is_correct { "✓" } else { " " };
            println!("  {} {}", mark, word.text);
        }
    }

    let errors = catalog.validate();
    if !errors.is_empty() {
        println!("\nWarnings:");
        for error in errors {
            println!("  - {}", error);
        }
    }
    Ok(())
}
