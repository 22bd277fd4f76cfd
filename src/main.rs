use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use pawmatch::config::Settings;
use pawmatch::core::{FavoritesStore, MatchGenerator, SearchOrchestrator};
use pawmatch::models::{CriteriaPatch, SortKey};
use pawmatch::services::{Catalog, CatalogClient, CatalogError, JsonFileStorage};

/// Interactive session over the search, favorites and match workflows.
struct Repl {
    catalog: Arc<dyn Catalog>,
    orchestrator: SearchOrchestrator,
    matcher: MatchGenerator,
    favorites: FavoritesStore,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    // Initialize logging; RUST_LOG overrides the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting PawMatch against {}", settings.catalog.base_url);

    let catalog: Arc<dyn Catalog> = Arc::new(CatalogClient::new(
        settings.catalog.base_url.clone(),
        settings.catalog.session_cookie.clone(),
        settings.catalog.timeout(),
    ));

    info!("Catalog client initialized");

    let storage_dir = settings.favorites.resolved_dir();
    let favorites = FavoritesStore::load(Box::new(JsonFileStorage::new(&storage_dir)));

    info!(
        "Loaded {} favorites from {}",
        favorites.len(),
        storage_dir.display()
    );

    let mut repl = Repl {
        orchestrator: SearchOrchestrator::new(catalog.clone()),
        matcher: MatchGenerator::new(catalog.clone()),
        favorites,
        catalog,
    };

    // First page, unfiltered
    if let Err(e) = repl.orchestrator.set_criteria(CriteriaPatch::default()).await {
        error!("Initial page fetch failed: {}", e);
    }

    println!("PawMatch - adoptable dog search. Type 'help' for commands.");
    repl.render();

    // Async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\npawmatch> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if !repl.dispatch(line).await {
            break;
        }
    }

    Ok(())
}

impl Repl {
    /// Run one command line, returning false when the session should end.
    async fn dispatch(&mut self, line: &str) -> bool {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => return false,
            "help" => print_help(),
            "show" => self.render(),
            "breeds" => self.list_breeds().await,
            "breed" => match text_patch(arg) {
                Some(breed) => {
                    self.apply(CriteriaPatch {
                        breed: Some(breed),
                        ..CriteriaPatch::default()
                    })
                    .await
                }
                None => println!("usage: breed <name> (or 'breed -' to clear)"),
            },
            "zip" => match text_patch(arg) {
                Some(zip_code) => {
                    self.apply(CriteriaPatch {
                        zip_code: Some(zip_code),
                        ..CriteriaPatch::default()
                    })
                    .await
                }
                None => println!("usage: zip <code> (or 'zip -' to clear)"),
            },
            "name" => match text_patch(arg) {
                Some(search_term) => {
                    self.apply(CriteriaPatch {
                        search_term: Some(search_term),
                        ..CriteriaPatch::default()
                    })
                    .await
                }
                None => println!("usage: name <term> (or 'name -' to clear)"),
            },
            "age" => match arg {
                "" => println!("usage: age <years> (or 'age -' to clear)"),
                "-" => {
                    self.apply(CriteriaPatch {
                        age: Some(None),
                        ..CriteriaPatch::default()
                    })
                    .await
                }
                _ => match arg.parse::<u8>() {
                    Ok(age) => {
                        self.apply(CriteriaPatch {
                            age: Some(Some(age)),
                            ..CriteriaPatch::default()
                        })
                        .await
                    }
                    Err(_) => println!("age must be a small whole number"),
                },
            },
            "sort" => match arg {
                "" => println!("usage: sort <name|age>:<asc|desc> (or 'sort -' to clear)"),
                "-" | "none" => {
                    self.apply(CriteriaPatch {
                        sort: Some(None),
                        ..CriteriaPatch::default()
                    })
                    .await
                }
                _ => match arg.parse::<SortKey>() {
                    Ok(key) => {
                        self.apply(CriteriaPatch {
                            sort: Some(Some(key)),
                            ..CriteriaPatch::default()
                        })
                        .await
                    }
                    Err(e) => println!("{}", e),
                },
            },
            "page" => match arg.parse::<u32>() {
                Ok(page) => self.go_to_page(page).await,
                Err(_) => println!("usage: page <number>"),
            },
            "next" => {
                let page = self.orchestrator.current_view().criteria.page;
                self.go_to_page(page + 1).await;
            }
            "prev" => {
                let page = self.orchestrator.current_view().criteria.page;
                self.go_to_page(page.saturating_sub(1)).await;
            }
            "retry" => {
                match self.orchestrator.refresh().await {
                    Ok(()) => self.render(),
                    Err(e) => eprintln!("error: {}", e),
                }
            }
            "reset" => {
                match self.orchestrator.reset().await {
                    Ok(()) => self.render(),
                    Err(e) => eprintln!("error: {}", e),
                }
            }
            "fav" => self.toggle_favorite(arg),
            "favs" => self.show_favorites().await,
            "clearfavs" => match self.favorites.clear() {
                Ok(()) => println!("favorites cleared"),
                Err(e) => eprintln!("warning: favorites not persisted: {}", e),
            },
            "match" => self.generate_match().await,
            _ => println!("unknown command '{}', type 'help'", command),
        }

        true
    }

    async fn apply(&self, patch: CriteriaPatch) {
        match self.orchestrator.set_criteria(patch).await {
            Ok(()) => self.render(),
            Err(e) => eprintln!("error: {}", e),
        }
    }

    async fn go_to_page(&self, page: u32) {
        match self.orchestrator.set_page(page).await {
            Ok(()) => self.render(),
            Err(e) => eprintln!("error: {}", e),
        }
    }

    fn render(&self) {
        let view = self.orchestrator.current_view();

        if let Some(error) = &view.error {
            println!("! {}", error);
        }

        let mut filters = Vec::new();
        if let Some(breed) = &view.criteria.breed {
            filters.push(format!("breed={}", breed));
        }
        if let Some(zip) = &view.criteria.zip_code {
            filters.push(format!("zip={}", zip));
        }
        if let Some(term) = &view.criteria.search_term {
            filters.push(format!("name~{}", term));
        }
        if let Some(age) = view.criteria.age {
            filters.push(format!("age={}", age));
        }
        if let Some(sort) = view.criteria.sort {
            filters.push(format!("sort={}", sort));
        }
        if !filters.is_empty() {
            println!("[{}]", filters.join(", "));
        }

        println!(
            "Page {}/{} ({} dogs total)",
            view.criteria.page,
            view.page.page_count().max(1),
            view.page.total
        );

        if view.page.dogs.is_empty() {
            println!("  (no dogs on this page)");
        }
        for dog in &view.page.dogs {
            let heart = if self.favorites.contains(&dog.id) { "♥" } else { " " };
            println!(
                " {} [{}] {} - {}, age {}, zip {}",
                heart, dog.id, dog.name, dog.breed, dog.age, dog.zip_code
            );
        }
    }

    async fn list_breeds(&self) {
        match self.catalog.list_breeds().await {
            Ok(breeds) => {
                println!("{} breeds:", breeds.len());
                for chunk in breeds.chunks(4) {
                    println!("  {}", chunk.join(", "));
                }
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }

    fn toggle_favorite(&mut self, id: &str) {
        if id.is_empty() {
            println!("usage: fav <dog-id>");
            return;
        }

        match self.favorites.toggle(id) {
            Ok(true) => println!("♥ added {} ({} favorites)", id, self.favorites.len()),
            Ok(false) => println!("removed {} ({} favorites)", id, self.favorites.len()),
            Err(e) => eprintln!("warning: favorites not persisted: {}", e),
        }
    }

    async fn show_favorites(&self) {
        if self.favorites.is_empty() {
            println!("No favorites yet. Add one with: fav <dog-id>");
            return;
        }

        match self.catalog.fetch_details(&self.favorites.sorted_ids()).await {
            Ok(dogs) => {
                println!("{} favorites:", dogs.len());
                for dog in dogs {
                    println!(
                        " ♥ [{}] {} - {}, age {}, zip {}",
                        dog.id, dog.name, dog.breed, dog.age, dog.zip_code
                    );
                }
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }

    async fn generate_match(&self) {
        match self.matcher.generate_match(&self.favorites).await {
            Ok(dog) => {
                println!("\nYour match: {} the {}!", dog.name, dog.breed);
                println!("  age {}, zip {}", dog.age, dog.zip_code);
                println!("  photo: {}", dog.img);
            }
            Err(CatalogError::NoFavorites) => {
                println!("No favorites yet. Add one with: fav <dog-id>");
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }
}

/// Parse a text-filter argument: `-` clears, anything else sets.
fn text_patch(arg: &str) -> Option<Option<String>> {
    match arg {
        "" => None,
        "-" => Some(None),
        _ => Some(Some(arg.to_string())),
    }
}

fn print_help() {
    println!("Search:");
    println!("  breed <name>|-    filter by breed (- clears)");
    println!("  zip <code>|-      filter by zip code");
    println!("  name <term>|-     keep dogs whose name contains <term>");
    println!("  age <years>|-     keep dogs of exactly this age");
    println!("  sort <f>:<d>|-    sort by name|age, asc|desc");
    println!("  page <n>          jump to a page (next / prev also work)");
    println!("  retry             refetch the current page");
    println!("  reset             clear every filter");
    println!("  show              re-print the current page");
    println!("  breeds            list all known breeds");
    println!("Favorites and matching:");
    println!("  fav <id>          toggle a favorite");
    println!("  favs              show favorites with details");
    println!("  clearfavs         remove all favorites");
    println!("  match             pick an adoption match from favorites");
    println!("  help | quit");
}
