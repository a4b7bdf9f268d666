use anyhow::{Context, Result};
use blog_client::{BlogClient, BlogClientError};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const DEFAULT_SERVER: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Server base URL (falls back to $BLOG_SERVER, then http://localhost:3000)
    #[arg(short, long)]
    server: Option<String>,

    /// Where the bearer token is kept (default: ~/.blog_token)
    #[arg(long)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Revoke the saved token (or every token with --all)
    Logout {
        #[arg(long)]
        all: bool,
    },

    /// Show the locally saved token
    Status,

    /// Show the user the saved token belongs to
    Whoami,

    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,
    },

    Get {
        #[arg(short, long)]
        slug: String,
    },

    Delete {
        #[arg(short, long)]
        slug: String,
    },

    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Upload a file to media storage (or static storage with --static)
    Upload {
        #[arg(short, long)]
        key: String,

        #[arg(short, long)]
        file: PathBuf,

        #[arg(long = "static")]
        static_file: bool,
    },
}

struct TokenManager {
    token_path: PathBuf,
}

impl TokenManager {
    fn new(custom_path: Option<PathBuf>) -> Result<Self> {
        let token_path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(".blog_token")
            }
        };

        Ok(Self { token_path })
    }

    fn save_token(&self, token: &str) -> Result<()> {
        fs::write(&self.token_path, token)
            .with_context(|| format!("Failed to save token to {:?}", self.token_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.token_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.token_path, perms)?;
        }

        println!("✓ Token saved to {:?}", self.token_path);
        Ok(())
    }

    fn load_token(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read token file"),
        }
    }

    fn clear_token(&self) -> Result<()> {
        if self.token_path.exists() {
            fs::remove_file(&self.token_path)
                .with_context(|| format!("Failed to remove token file {:?}", self.token_path))?;
            println!("✓ Token file removed");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = cli
        .server
        .or_else(|| std::env::var("BLOG_SERVER").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    let token_manager = TokenManager::new(cli.token_file)?;

    // Needs no server round trip
    if let Commands::Status = cli.command {
        match token_manager.load_token()? {
            Some(token) => {
                println!("🔑 Token file: {:?}", token_manager.token_path);
                println!("   Token: {}...", token.chars().take(20).collect::<String>());
                println!("   Length: {} characters", token.len());
                println!("\n   To verify the token, try: blog-cli whoami");
            }
            None => {
                println!("{}", "❌ No token found".red());
                println!("   Please login first: blog-cli login --username <username> --password <password>");
            }
        }
        return Ok(());
    }

    println!("🔌 Connecting to: {}", server);
    let mut client = BlogClient::new(server);
    if let Some(token) = token_manager.load_token()? {
        client.set_token(token);
    }

    if let Err(e) = run(&mut client, &token_manager, cli.command).await {
        report(&e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(
    client: &mut BlogClient,
    token_manager: &TokenManager,
    command: Commands,
) -> Result<(), BlogClientError> {
    match command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            println!("📝 Registering user: {}", username);
            let response = client.register(username, email, password).await?;
            println!("{}", "✅ Registration successful!".green());
            println!("   User ID: {}", response.user.id);
            println!("   Username: {}", response.user.username);
            println!("   Email: {}", response.user.email);
            save(token_manager, &response.token);
        }

        Commands::Login { username, password } => {
            println!("🔑 Logging in as: {}", username);
            let response = client.login(username, password).await?;
            println!("{}", "✅ Login successful!".green());
            println!("   User ID: {}", response.user.id);
            println!("   Username: {}", response.user.username);
            save(token_manager, &response.token);
        }

        Commands::Logout { all } => {
            let result = if all {
                client.logout_all().await
            } else {
                client.logout().await
            };

            match result {
                Ok(()) if all => println!("{}", "✅ Logged out of every session".green()),
                Ok(()) => println!("{}", "✅ Logged out".green()),
                // Revoked or expired on the server
                Err(BlogClientError::Unauthorized(_)) => {
                    println!("⚠️ Saved token was already invalid on the server")
                }
                Err(e) => return Err(e),
            }
            if let Err(e) = token_manager.clear_token() {
                println!("⚠️ {}", e);
            }
        }

        Commands::Status => unreachable!("status is answered before connecting"),

        Commands::Whoami => {
            let user = client.me().await?;
            println!("👤 {} <{}> (id {})", user.username, user.email, user.id);
            println!("   Registered: {}", user.created_at);
        }

        Commands::Create { title, description } => {
            println!("📝 Creating new blog...");
            let blog = client.create_blog(title, description).await?;
            println!("{}", "✅ Blog created successfully!".green());
            println!("   Slug: {}", blog.slug);
            println!("   Title: {}", blog.title);
            println!("   Owner ID: {}", blog.owner);
            println!("   Created: {}", blog.created_at);
        }

        Commands::Get { slug } => {
            println!("🔍 Getting blog '{}'", slug);
            let blog = client.get_blog(&slug).await?;
            println!("   Slug: {}", blog.slug);
            println!("   Title: {}", blog.title);
            println!("   Description: {}", blog.description);
            println!("   Owner ID: {}", blog.owner);
            println!("   Created: {}", blog.created_at);
        }

        Commands::Delete { slug } => {
            println!("🗑️ Deleting blog '{}'", slug);
            client.delete_blog(&slug).await?;
            println!("{}", "✅ Blog deleted successfully!".green());
        }

        Commands::List { page } => {
            println!("📋 Listing blogs (page {})", page);
            let list = client.list_blogs(Some(page)).await?;
            println!("✅ {} blogs in total", list.count);
            println!();

            if list.results.is_empty() {
                println!("   No blogs yet");
                println!("   Tip: blog-cli create --title \"My Blog\" --description \"Hello\"");
            }
            for blog in &list.results {
                println!("   [{}] {}", blog.slug, blog.title);
                println!("      Created: {}", blog.created_at);
                println!("      {}", truncate(&blog.description, 50));
                println!();
            }
            if list.next.is_some() {
                println!("   More: blog-cli list --page {}", page + 1);
            }
        }

        Commands::Upload {
            key,
            file,
            static_file,
        } => {
            let bytes = fs::read(&file).map_err(|e| {
                BlogClientError::InvalidRequest(format!("Cannot read {:?}: {}", file, e))
            })?;
            println!("⬆️ Uploading {} bytes as '{}'", bytes.len(), key);
            let media = if static_file {
                client.upload_static(&key, bytes).await?
            } else {
                client.upload_media(&key, bytes).await?
            };
            println!("{}", "✅ Uploaded".green());
            println!("   URL: {}", media.url);
        }
    }

    Ok(())
}

fn save(token_manager: &TokenManager, token: &str) {
    if let Err(e) = token_manager.save_token(token) {
        println!("⚠️ {}", e);
    }
}

fn report(e: &BlogClientError) {
    match e {
        BlogClientError::Unauthorized(_) => {
            println!("{}", "❌ Unauthorized. Please login first:".red());
            println!("   blog-cli login --username <username> --password <password>");
        }
        BlogClientError::NotFound => {
            println!("{}", "❌ Not found".red());
            println!("   Tip: use 'list' to see available blogs");
        }
        BlogClientError::Validation(fields) => {
            println!("{}", "❌ Invalid input:".red());
            for (field, messages) in fields {
                println!("   {}: {}", field, messages.join(" "));
            }
        }
        other => println!("{} {}", "❌ Error:".red(), other),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
