use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gem_console::{
    ApiClient, Config, ConsoleError, FileInput, FilterPatch, ListView, Result, ResourceKind,
    Screen, Status,
};

#[derive(Parser)]
#[command(name = "gem-console")]
#[command(about = "Admin console for GEM products and stores")]
#[command(version)]
struct Cli {
    /// Backend origin, e.g. https://admin.gem.example
    #[arg(long, env = "GEM_CONSOLE_URL", global = true, default_value = "http://localhost:8000")]
    base_url: String,

    /// Raw Cookie header for the authenticated session (sessionid + csrftoken)
    #[arg(long, env = "GEM_CONSOLE_COOKIE", global = true, default_value = "")]
    session_cookie: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage catalog products
    #[command(subcommand)]
    Products(ResourceCommand),

    /// Manage retail stores
    #[command(subcommand)]
    Stores(ResourceCommand),
}

#[derive(Subcommand)]
enum ResourceCommand {
    /// List one page of records
    Ls {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Status filter: active, training, review, inactive
        #[arg(long, value_parser = parse_status)]
        status: Option<Status>,

        /// Category id filter
        #[arg(long)]
        category: Option<i64>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Show one record in full
    Show { id: i64 },

    /// Create a record
    Create {
        #[command(flatten)]
        fields: FormArgs,
    },

    /// Update a record; unspecified flags keep their current values
    Edit {
        id: i64,

        #[command(flatten)]
        fields: FormArgs,
    },

    /// Delete a record
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show aggregate KPIs
    Metrics,

    /// Print the CSV export URL for the given filters
    ExportUrl {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, value_parser = parse_status)]
        status: Option<Status>,

        #[arg(long)]
        category: Option<i64>,
    },
}

#[derive(clap::Args)]
struct FormArgs {
    /// Display name
    #[arg(long)]
    name: Option<String>,

    /// SKU (products) or store code (stores)
    #[arg(long)]
    code: Option<String>,

    /// Category id; pass 0 to clear
    #[arg(long)]
    category: Option<i64>,

    /// Status: active, training, review, inactive
    #[arg(long, value_parser = parse_status)]
    status: Option<Status>,

    /// Unit price in VNĐ (products)
    #[arg(long)]
    price: Option<f64>,

    /// Recognition accuracy percent, 0-100 (products)
    #[arg(long)]
    accuracy: Option<f64>,

    /// Detection count (products)
    #[arg(long)]
    detections: Option<i64>,

    /// Free-text description
    #[arg(long)]
    description: Option<String>,

    /// Street address (stores)
    #[arg(long)]
    address: Option<String>,

    /// Detection confidence as a 0-1 decimal (stores)
    #[arg(long)]
    confidence: Option<f64>,

    /// Image file to attach; repeatable
    #[arg(long = "image")]
    images: Vec<PathBuf>,
}

fn parse_status(s: &str) -> std::result::Result<Status, String> {
    Status::from_str(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (kind, command) = match cli.command {
        Commands::Products(command) => (ResourceKind::Products, command),
        Commands::Stores(command) => (ResourceKind::Stores, command),
    };

    match run(&cli.base_url, &cli.session_cookie, kind, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    base_url: &str,
    session_cookie: &str,
    kind: ResourceKind,
    command: ResourceCommand,
) -> Result<()> {
    let config = Config::new(base_url, session_cookie)?;
    let api = ApiClient::new(config);
    let mut screen = Screen::new(kind, api);

    match command {
        ResourceCommand::Ls {
            search,
            status,
            category,
            page,
        } => {
            screen.query.set_filter(filter_patch(search, status, category));
            screen.query.set_page(page);
            screen.reload().await;
            settle(&mut screen)?;
            match &screen.list {
                ListView::Loaded {
                    body_html,
                    pagination,
                } => {
                    println!("{body_html}");
                    println!("{}", pagination.label);
                }
                ListView::Failed(message) => {
                    return Err(ConsoleError::Api(message.clone()));
                }
                ListView::Loading => unreachable!("reload always settles the list view"),
            }
        }

        ResourceCommand::Show { id } => {
            screen.open_view(id).await;
            settle(&mut screen)?;
            let detail = screen
                .detail
                .as_ref()
                .ok_or_else(|| ConsoleError::Api(format!("no record {id}")))?;
            println!("{}", detail.name);
            println!("{}", detail.subtitle);
            println!("Trạng thái:     {}", detail.status);
            println!("Độ chính xác:   {}", detail.accuracy);
            println!("Lượt nhận diện: {}", detail.detection_count);
            println!("Nhận diện cuối: {}", detail.last_detected);
            println!("Danh mục:       {}", detail.category);
            if let Some(price) = &detail.price {
                println!("Giá:            {price}");
            }
            if let Some(address) = &detail.address {
                println!("Địa chỉ:        {address}");
            }
            println!("Ngày tạo:       {}", detail.created_at);
            if let Some(image_url) = &detail.image_url {
                println!("Ảnh:            {image_url}");
            }
        }

        ResourceCommand::Create { fields } => {
            screen.init().await;
            settle(&mut screen)?;
            screen.open_create();
            apply_form(&mut screen, fields).await?;
            submit(&mut screen).await?;
            println!("Created.");
        }

        ResourceCommand::Edit { id, fields } => {
            screen.init().await;
            settle(&mut screen)?;
            screen.open_edit(id).await;
            settle(&mut screen)?;
            apply_form(&mut screen, fields).await?;
            submit(&mut screen).await?;
            println!("Updated.");
        }

        ResourceCommand::Delete { id, yes } => {
            if !yes {
                println!("{} (pass --yes to confirm)", screen.confirm_delete_message());
                return Ok(());
            }
            screen.delete(id, true).await;
            settle(&mut screen)?;
            println!("Deleted.");
        }

        ResourceCommand::Metrics => {
            screen.init().await;
            settle(&mut screen)?;
            let metrics = screen.metrics.clone().unwrap_or_default();
            let totals = [
                ("total_products", metrics.total_products),
                ("active_products", metrics.active_products),
                ("total_stores", metrics.total_stores),
                ("active_stores", metrics.active_stores),
                ("review_count", metrics.review_count),
            ];
            for (label, value) in totals {
                if let Some(value) = value {
                    println!("{label}: {value}");
                }
            }
            if let Some(avg) = metrics.avg_accuracy_rate {
                println!("avg_accuracy_rate: {avg:.1}%");
            }
        }

        ResourceCommand::ExportUrl {
            search,
            status,
            category,
        } => {
            screen.query.set_filter(filter_patch(search, status, category));
            println!("{}", screen.export_url()?);
        }
    }
    Ok(())
}

fn filter_patch(search: Option<String>, status: Option<Status>, category: Option<i64>) -> FilterPatch {
    FilterPatch {
        search,
        status: status.map(|s| s.as_str().to_string()),
        category: category.map(|c| c.to_string()),
    }
}

/// Copy provided flags into the open form and stage any image files.
async fn apply_form(screen: &mut Screen, fields: FormArgs) -> Result<()> {
    if let Some(name) = fields.name {
        screen.form.name = name;
    }
    if let Some(code) = fields.code {
        screen.form.code = code;
    }
    if let Some(category) = fields.category {
        screen.form.category = if category == 0 {
            String::new()
        } else {
            category.to_string()
        };
    }
    if let Some(status) = fields.status {
        screen.form.status = status;
    }
    if let Some(price) = fields.price {
        screen.form.price = price.to_string();
    }
    if let Some(accuracy) = fields.accuracy {
        screen.form.accuracy = accuracy.to_string();
    }
    if let Some(detections) = fields.detections {
        screen.form.detection_count = detections.to_string();
    }
    if let Some(description) = fields.description {
        screen.form.description = description;
    }
    if let Some(address) = fields.address {
        screen.form.address = address;
    }
    if let Some(confidence) = fields.confidence {
        screen.form.confidence_decimal = confidence.to_string();
    }

    for path in fields.images {
        let bytes = tokio::fs::read(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = image_content_type(&path).ok_or_else(|| {
            ConsoleError::Config(format!("'{}' is not a supported image file", path.display()))
        })?;
        let staged = screen.stage_files([FileInput {
            name,
            content_type: content_type.to_string(),
            bytes,
        }]);
        if staged == 0 {
            tracing::warn!(path = %path.display(), "image already staged, skipping");
        }
    }
    Ok(())
}

fn image_content_type(path: &std::path::Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Run the save and translate engine state into a process result.
async fn submit(screen: &mut Screen) -> Result<()> {
    screen.save().await;
    settle(screen)?;
    if let Some(message) = screen.form_error.take() {
        return Err(ConsoleError::Api(message));
    }
    Ok(())
}

/// Surface the navigation and alert signals as process errors.
fn settle(screen: &mut Screen) -> Result<()> {
    if let Some(login) = screen.navigate_to.clone() {
        return Err(ConsoleError::Unauthorized { login });
    }
    if let Some(alert) = screen.take_alert() {
        return Err(ConsoleError::Api(alert));
    }
    Ok(())
}
