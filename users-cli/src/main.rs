use clap::Parser;
use users_client::{NewUser, User, UserPatch, UsersClient};

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long)]
    server: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    List,
    Get {
        id: u64,
    },
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        age: Option<i64>,
    },
    Update {
        id: u64,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        email: Option<String>,
        #[clap(long)]
        age: Option<i64>,
    },
    Delete {
        id: u64,
    },
}

fn print_user(user: &User) {
    let age = user
        .age
        .map_or_else(|| "-".to_string(), |age| age.to_string());
    println!(
        "- [{}] {} <{}> age: {} active: {}",
        user.id, user.name, user.email, age, user.active
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let endpoint = args.server.as_deref().unwrap_or("http://127.0.0.1:3000");
    let client = UsersClient::new(endpoint)?;

    match args.command {
        Command::List => {
            let users = client.list().await?;
            println!("Users ({})", users.len());
            for user in &users {
                print_user(user);
            }
        }
        Command::Get { id } => {
            let user = client.get(id).await?;
            print_user(&user);
        }
        Command::Create { name, email, age } => {
            let user = client.create(&NewUser { name, email, age }).await?;
            println!("User created! ID: {}", user.id);
        }
        Command::Update {
            id,
            name,
            email,
            age,
        } => {
            let user = client.update(id, &UserPatch { name, email, age }).await?;
            print_user(&user);
        }
        Command::Delete { id } => {
            let user = client.delete(id).await?;
            println!("User {} deleted!", user.id);
        }
    }

    Ok(())
}
