use clap::{Parser, Subcommand};
use dialoguer::{Input, Password, Select};
use dotenvy::dotenv;
use stockflow_cli::seeder::{DEFAULT_ACCOUNTS, create_user, seed_default_users};
use stockflow_config::{DatabaseConfig, PasswordConfig};
use stockflow_core::{PasswordHasher, UserRole};
use stockflow_db::{PgPool, PgUserStore, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "stockflow-cli")]
#[command(about = "Stockflow CLI - Administrative tools for Stockflow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Create the default admin, manager and staff accounts
    Seed,
    /// Create a single user account
    CreateUser {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Display name
        #[arg(short = 'f', long)]
        fullname: Option<String>,

        /// Role: admin, manager or staff
        #[arg(short = 'r', long)]
        role: Option<UserRole>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockflow_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&db_config).await?;
    let hasher = PasswordHasher::new(PasswordConfig::from_env().cost);

    match cli.command {
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::Seed => handle_seed(pool, hasher).await,
        Commands::CreateUser {
            username,
            fullname,
            role,
            password,
        } => handle_create_user(pool, hasher, username, fullname, role, password).await,
    }
}

async fn handle_migrate(pool: &PgPool) -> anyhow::Result<()> {
    run_migrations(pool).await?;
    println!("✅ Migrations applied");
    Ok(())
}

async fn handle_seed(pool: PgPool, hasher: PasswordHasher) -> anyhow::Result<()> {
    run_migrations(&pool).await?;
    let store = PgUserStore::new(pool);

    let report = seed_default_users(&store, hasher).await?;

    println!("\n✅ Seeding complete");
    println!("   Created: {}", report.created.len());
    println!("   Skipped (already exist): {}", report.skipped.len());
    println!("\nDefault users:");
    for account in DEFAULT_ACCOUNTS {
        println!(
            "   {:<8} - username: {:<8} password: {}",
            account.role.as_str(),
            account.username,
            account.password
        );
    }

    Ok(())
}

async fn handle_create_user(
    pool: PgPool,
    hasher: PasswordHasher,
    username: Option<String>,
    fullname: Option<String>,
    role: Option<UserRole>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let fullname = match fullname {
        Some(fullname) => fullname,
        None => Input::new().with_prompt("Full name").interact_text()?,
    };

    let role = match role {
        Some(role) => role,
        None => {
            let index = Select::new()
                .with_prompt("Role")
                .items(&UserRole::ALL.map(|r| r.as_str()))
                .default(2)
                .interact()?;
            UserRole::ALL[index]
        }
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let store = PgUserStore::new(pool);
    let user = create_user(&store, hasher, &username, &password, &fullname, role).await?;

    println!("\n✅ User created successfully!");
    println!("   ID: {}", user.id);
    println!("   Username: {}", user.username);
    println!("   Role: {}", user.role);

    Ok(())
}
