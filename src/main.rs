//! Seatcart CLI

use std::{
    io::{self, Write},
    path::PathBuf,
    process,
    sync::Arc,
};

use clap::{Args, Parser, Subcommand};
use seatcart::{
    config::{Config, load_dotenv},
    fixtures::Fixture,
    forms::CheckoutForm,
    gateway::{Backend, HttpBackend, MemoryBackend},
    lessons::LessonId,
    notices::NoticeKind,
    observability::init_subscriber,
    render::{write_cart_table, write_catalog_table, write_order_summary},
    storefront::{CheckoutError, Storefront, StorefrontOptions},
    views::{SortField, SortOrder},
};

#[derive(Debug, Parser)]
#[command(name = "seatcart", about = "Browse and book lesson seats", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    /// Serve lessons from a fixture set instead of the backend
    #[arg(long, value_name = "FIXTURE")]
    offline: Option<String>,

    /// Directory holding fixture sets, used with --offline
    #[arg(long, default_value = "./fixtures")]
    fixtures_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every lesson
    Lessons(SortArgs),

    /// Search lessons by subject or location
    Search(SearchArgs),

    /// Reserve seats on a lesson and place the order
    Book(BookArgs),
}

#[derive(Debug, Args)]
struct SortArgs {
    /// Field to sort by
    #[arg(long, value_enum, default_value_t = SortField::Subject)]
    sort: SortField,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
    order: SortOrder,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Text to look for in the subject or location
    query: String,

    #[command(flatten)]
    sort: SortArgs,
}

#[derive(Debug, Args)]
struct BookArgs {
    /// Lesson id
    #[arg(long)]
    lesson: String,

    /// Seats to reserve
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    quantity: u32,

    /// Customer name
    #[arg(long)]
    name: String,

    /// Customer phone number
    #[arg(long)]
    phone: String,
}

#[tokio::main]
pub async fn main() {
    load_dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        #[expect(
            clippy::print_stderr,
            clippy::exit,
            reason = "errors are reported to the terminal after logging may have failed"
        )]
        {
            eprintln!("{error}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    init_subscriber(&cli.config.logging).map_err(|error| error.to_string())?;

    let (backend, options) = connect(&cli)?;
    let mut storefront = Storefront::new(backend, options);

    let result = match cli.command {
        Commands::Lessons(sort) => list_lessons(&mut storefront, &sort).await,
        Commands::Search(args) => search_lessons(&mut storefront, args).await,
        Commands::Book(args) => book(&mut storefront, args).await,
    };

    write_notices(&mut storefront)?;

    result
}

fn connect(cli: &Cli) -> Result<(Arc<dyn Backend>, StorefrontOptions), String> {
    match &cli.offline {
        Some(set) => {
            let mut fixture = Fixture::with_base_path(&cli.fixtures_dir);

            fixture
                .load_lessons(set)
                .map_err(|error| format!("failed to load fixture {set}: {error}"))?;

            let options = cli
                .config
                .offline_storefront_options(&fixture)
                .map_err(|error| format!("fixture {set} has no usable currency: {error}"))?;

            let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::from_fixture(&fixture));

            Ok((backend, options))
        }
        None => {
            let backend: Arc<dyn Backend> = Arc::new(
                HttpBackend::new(cli.config.http_backend_config())
                    .map_err(|error| format!("failed to create backend client: {error}"))?,
            );

            Ok((backend, cli.config.storefront_options()))
        }
    }
}

async fn list_lessons(storefront: &mut Storefront, sort: &SortArgs) -> Result<(), String> {
    storefront
        .refresh()
        .await
        .map_err(|error| format!("failed to load lessons: {error}"))?;

    write_catalog_table(
        io::stdout().lock(),
        &storefront.sorted(sort.sort, sort.order),
        storefront.cart(),
    )
    .map_err(|error| error.to_string())
}

async fn search_lessons(storefront: &mut Storefront, args: SearchArgs) -> Result<(), String> {
    storefront.schedule_search(args.query);

    match storefront.wait_for_search().await {
        Some(Ok(_)) => write_catalog_table(
            io::stdout().lock(),
            &storefront.sorted(args.sort.sort, args.sort.order),
            storefront.cart(),
        )
        .map_err(|error| error.to_string()),
        Some(Err(error)) => Err(format!("search failed: {error}")),
        None => Err("search was cancelled".to_string()),
    }
}

async fn book(storefront: &mut Storefront, args: BookArgs) -> Result<(), String> {
    let lesson = LessonId::new(args.lesson);

    storefront
        .refresh()
        .await
        .map_err(|error| format!("failed to load lessons: {error}"))?;

    if storefront.catalog().find_by_id(&lesson).is_none() {
        return Err(format!("no lesson with id {lesson}"));
    }

    for _ in 0..args.quantity {
        storefront.stage_increase(&lesson);
    }

    let staged = storefront.staged(&lesson);

    if staged < args.quantity {
        return Err(format!(
            "only {staged} seats left on lesson {lesson}, {} requested",
            args.quantity
        ));
    }

    storefront
        .add_to_cart(&lesson)
        .map_err(|error| error.to_string())?;

    write_cart_table(io::stdout().lock(), storefront.cart(), storefront.currency())
        .map_err(|error| error.to_string())?;

    match storefront
        .checkout(CheckoutForm::new(args.name, args.phone))
        .await
    {
        Ok(order) => {
            write_order_summary(io::stdout().lock(), &order).map_err(|error| error.to_string())
        }
        Err(CheckoutError::Validation(errors)) => {
            let messages: Vec<&str> = errors.errors().iter().map(|error| error.message).collect();

            Err(messages.join(" "))
        }
        Err(error) => Err(error.to_string()),
    }
}

fn write_notices(storefront: &mut Storefront) -> Result<(), String> {
    let mut out = io::stdout().lock();

    for notice in storefront.drain_notices() {
        let marker = match notice.kind {
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✗",
        };

        writeln!(out, "{marker} {notice}").map_err(|error| error.to_string())?;
    }

    Ok(())
}
