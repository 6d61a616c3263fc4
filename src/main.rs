use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use six_cities::actions::{Coordinator, ToggleOutcome};
use six_cities::api::ApiClient;
use six_cities::config;
use six_cities::model::{AuthData, SortOrder};
use six_cities::routes::Route;
use six_cities::selectors::{self, Selectors};
use six_cities::store::Store;
use six_cities::token::{FileTokenStore, TokenStore};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the offers of one city
    Catalog {
        /// City name; defaults to the city of the first listed offer
        #[arg(long)]
        city: Option<String>,
        /// popular, price-asc, price-desc or top-rated
        #[arg(long, default_value = "popular")]
        sort: SortOrder,
    },
    /// Show one offer with its reviews and nearby places
    Offer { id: String },
    /// Show saved offers grouped by city
    Favorites,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Add or remove an offer from favorites
    ToggleFavorite { id: String },
    /// Post a review for an offer
    Review {
        id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
    },
}

fn navigate(route: Route) {
    info!(%route, "navigate");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config)).with_context(|| {
        format!(
            "failed to load {}; a minimal config looks like:\n{}",
            args.config.display(),
            config::example()
        )
    })?;
    cfg.ensure_dirs()?;

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(cfg.token_path()));
    let api = ApiClient::from_config(&cfg, Arc::clone(&tokens)).context("failed to build API client")?;
    let coordinator = Coordinator::new(Arc::new(api), tokens, Store::new());

    coordinator
        .bootstrap()
        .await
        .context("failed to load the catalog")?;

    match args.command {
        Command::Catalog { city, sort } => show_catalog(&coordinator, city.as_deref(), sort),
        Command::Offer { id } => show_offer(&coordinator, &id).await,
        Command::Favorites => show_favorites(&coordinator),
        Command::Login { email, password } => {
            let credentials = AuthData::new(email, password);
            credentials.validate()?;
            coordinator.login(&credentials, navigate).await?;
            println!("Signed in as {}", coordinator.store().read(|s| s.auth.name.clone()));
            Ok(())
        }
        Command::Logout => {
            coordinator.logout(navigate).await?;
            println!("Signed out");
            Ok(())
        }
        Command::ToggleFavorite { id } => {
            let currently = coordinator.store().read(|s| s.favorites.contains(&id));
            match coordinator.toggle_favorite(&id, currently, navigate).await? {
                ToggleOutcome::Sent(offer) => {
                    coordinator.fetch_favorites().await?;
                    let verb = if currently { "Removed" } else { "Added" };
                    println!("{} '{}' {} favorites", verb, offer.title, if currently { "from" } else { "to" });
                    Ok(())
                }
                ToggleOutcome::RedirectedToLogin => bail!("sign in first (six-cities login)"),
            }
        }
        Command::Review { id, rating, comment } => {
            coordinator.post_review(&id, rating, &comment).await?;
            let count = coordinator.store().read(|s| s.current_offer.reviews.data.len());
            println!("Review posted; offer {} now has {} reviews", id, count);
            Ok(())
        }
    }
}

fn show_catalog(coordinator: &Coordinator, city: Option<&str>, sort: SortOrder) -> Result<()> {
    let mut memo = Selectors::new();
    if let Some(name) = city {
        let cities = memo.cities(&coordinator.store().snapshot());
        let chosen = cities
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| {
                let known: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
                anyhow!("unknown city '{}' (known: {})", name, known.join(", "))
            })?;
        coordinator.set_selected_city(chosen);
    }
    coordinator.set_sort_order(sort);

    let state = coordinator.store().snapshot();
    let offers = memo.city_filtered_catalog(&state);
    println!(
        "{} places to stay in {} (sorted: {})",
        offers.len(),
        state.city.city.name,
        state.catalog.sort
    );
    for offer in offers.iter() {
        let premium = if offer.is_premium { " [Premium]" } else { "" };
        let bookmark = if selectors::is_favorite(&state.favorites.offers, &offer.id) { " *" } else { "" };
        println!(
            "  {}{}{} | €{}/night | {} | rating {:.1} ({}%) | id {}",
            offer.title,
            premium,
            bookmark,
            offer.price,
            offer.kind,
            offer.rating,
            selectors::rating_width(offer.rating),
            offer.id
        );
    }
    Ok(())
}

async fn show_offer(coordinator: &Coordinator, id: &str) -> Result<()> {
    let fetch = coordinator.fetch_current_offer(id, navigate).await;
    let offer = fetch.detail.with_context(|| format!("offer {} not found", id))?;
    fetch.sub_fetches.join().await;

    let state = coordinator.store().snapshot();
    println!("{} ({}, {})", offer.title, offer.kind, offer.city.name);
    println!("  €{}/night, {} bedrooms, up to {} adults", offer.price, offer.bedrooms, offer.max_adults);
    println!("  host: {}{}", offer.host.name, if offer.host.is_pro { " (Pro)" } else { "" });
    println!("  goods: {}", offer.goods.join(", "));
    println!("  {}", offer.description);

    let reviews = &state.current_offer.reviews.data;
    println!("Reviews · {}", reviews.len());
    for review in reviews.iter() {
        let date = selectors::review_date(&review.date).unwrap_or_else(|| review.date.clone());
        println!("  {} ({}, {:.0}/5): {}", review.user.name, date, review.rating, review.comment);
    }

    println!("Other places in the neighbourhood:");
    for near in selectors::nearby_preview(&state.current_offer.nearby.data) {
        println!("  {} | €{}/night | id {}", near.title, near.price, near.id);
    }
    Ok(())
}

fn show_favorites(coordinator: &Coordinator) -> Result<()> {
    let state = coordinator.store().snapshot();
    if !state.auth.status.is_authenticated() {
        navigate(Route::Login);
        bail!("sign in first (six-cities login)");
    }

    let mut memo = Selectors::new();
    let groups = memo.favorites_by_city(&state);
    println!("Saved listing ({})", selectors::favorites_count(&state.favorites.offers));
    for group in groups.iter() {
        println!("{}", group.city);
        for offer in &group.offers {
            println!("  {} | €{}/night | id {}", offer.title, offer.price, offer.id);
        }
    }
    Ok(())
}
