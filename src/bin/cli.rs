use clap::{Parser, Subcommand};
use std::{io::Write, path::PathBuf, sync::Arc};
use userdir::{
    config::ServerConfig,
    db,
    models::{User, UserInput},
    repositories::SqliteUserRepository,
    services::{ListUsersQuery, UserService, UserServiceError},
};

#[derive(Parser)]
#[command(name = "userdir-cli")]
#[command(about = "CLI tool for managing the user directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Export all users as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        phone: String,
        #[arg(short, long)]
        address: String,
    },

    /// List users, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: i64,

        /// Match against name or email
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a single user
    Show {
        #[arg(long)]
        id: String,
    },

    /// Replace a user's details
    Update {
        #[arg(long)]
        id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        phone: String,
        #[arg(short, long)]
        address: String,
    },

    /// Delete a user
    Delete {
        #[arg(long)]
        id: String,
    },
}

fn print_user(user: &User) {
    println!("  ID:      {}", user.id);
    println!("  Name:    {}", user.name);
    println!("  Email:   {}", user.email);
    println!("  Phone:   {}", user.phone);
    println!("  Address: {}", user.address);
    println!("  Created: {}", user.created_at.to_rfc3339());
    println!("  Updated: {}", user.updated_at.to_rfc3339());
}

fn fail(err: UserServiceError) -> ! {
    match err {
        UserServiceError::Validation(errors) => {
            eprintln!("❌ Validation failed:");
            for error in errors {
                eprintln!("  {}: {}", error.field, error.message);
            }
        }
        other => eprintln!("❌ {}", other),
    }
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url).await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    // Initialize services
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository);

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                name,
                email,
                phone,
                address,
            } => match user_service
                .create_user(UserInput::new(name, email, phone, address))
                .await
            {
                Ok(user) => {
                    println!("✅ User created successfully!");
                    print_user(&user);
                }
                Err(e) => fail(e),
            },

            UserCommands::List {
                page,
                limit,
                search,
            } => {
                let result = user_service
                    .list_users(ListUsersQuery {
                        page: Some(page),
                        limit: Some(limit),
                        search,
                    })
                    .await
                    .unwrap_or_else(|e| fail(e));

                if result.users.is_empty() {
                    println!("No users found");
                } else {
                    println!(
                        "{:<36}  {:<25}  {:<30}  {:<17}",
                        "ID", "Name", "Email", "Phone"
                    );
                    println!("{}", "-".repeat(114));
                    for user in &result.users {
                        println!(
                            "{:<36}  {:<25}  {:<30}  {:<17}",
                            user.id, user.name, user.email, user.phone
                        );
                    }
                }

                let pagination = result.pagination;
                println!(
                    "\nPage {} of {} ({} users total)",
                    pagination.current_page, pagination.total_pages, pagination.total_users
                );
            }

            UserCommands::Show { id } => match user_service.get_user(&id).await {
                Ok(user) => print_user(&user),
                Err(e) => fail(e),
            },

            UserCommands::Update {
                id,
                name,
                email,
                phone,
                address,
            } => match user_service
                .update_user(&id, UserInput::new(name, email, phone, address))
                .await
            {
                Ok(user) => {
                    println!("✅ User updated successfully!");
                    print_user(&user);
                }
                Err(e) => fail(e),
            },

            UserCommands::Delete { id } => match user_service.delete_user(&id).await {
                Ok(()) => println!("✅ User deleted successfully"),
                Err(e) => fail(e),
            },
        },

        Commands::Export { output } => {
            let export = user_service.export_users().await.unwrap_or_else(|e| fail(e));
            let count = export.remaining_records();

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(std::io::BufWriter::new(std::fs::File::create(path)?)),
                None => Box::new(std::io::stdout().lock()),
            };
            for chunk in export.into_chunks() {
                writer.write_all(chunk.as_bytes())?;
            }
            writer.flush()?;

            if let Some(path) = output {
                println!("✅ Exported {} users to {}", count, path.display());
            }
        }
    }

    pool.close().await;

    Ok(())
}
