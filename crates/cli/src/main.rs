use clap::{Parser, Subcommand};
use intake_core::{
    business_offset_from_env_value, constants::DEFAULT_CUSTOMER_DATA_DIR, ClientId, CoreConfig,
    CustomerService, CustomerSubmission, IntakeError,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Customer intake records CLI")]
struct Cli {
    /// Customer data directory (defaults to $CUSTOMER_DATA_DIR, then ./customer_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all customers as jobs, most recent service first
    List,
    /// Print a stored customer record
    Show {
        /// Client id (32 lowercase hex characters)
        client_id: String,
    },
    /// Create a customer record
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone_number: String,
        #[arg(long)]
        address: String,
        /// ISO-8601 date-time, e.g. 2024-01-15T10:00:00Z
        #[arg(long)]
        service_date: String,
        #[arg(long, allow_negative_numbers = true)]
        quote_amount: f64,
        #[arg(long)]
        service_details: String,
    },
}

fn resolve_data_dir(flag: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    flag.or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CUSTOMER_DATA_DIR))
}

fn report(context: &str, err: IntakeError) {
    match err {
        IntakeError::Validation(errors) => {
            eprintln!("{}: invalid input", context);
            for e in errors.iter() {
                eprintln!("  {}: {}", e.field, e.reason);
            }
        }
        other => eprintln!("{}: {}", context, other),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(cli.data_dir, std::env::var("CUSTOMER_DATA_DIR").ok());
    let offset = business_offset_from_env_value(std::env::var("BUSINESS_UTC_OFFSET").ok())?;
    let cfg = CoreConfig::new(data_dir, offset)?;
    let service = CustomerService::from_config(&cfg);

    match cli.command {
        Some(Commands::List) => match service.list_jobs() {
            Ok(jobs) if jobs.is_empty() => println!("No customers found."),
            Ok(jobs) => {
                for job in jobs {
                    println!(
                        "ID: {}, Name: {}, Phone: {}, Address: {}, Last service: {}",
                        job.client_id,
                        job.full_name,
                        job.phone_number,
                        job.address,
                        job.last_service_date.format("%Y-%m-%d %H:%M %:z")
                    );
                }
            }
            Err(e) => report("Error listing customers", e),
        },
        Some(Commands::Show { client_id }) => match ClientId::parse(&client_id) {
            Ok(id) => match service.get_customer(&id) {
                Ok(document) => println!("{}", document),
                Err(e) => report("Error reading customer", e),
            },
            Err(e) => eprintln!("Error reading customer: {}", e),
        },
        Some(Commands::Create {
            first_name,
            last_name,
            email,
            phone_number,
            address,
            service_date,
            quote_amount,
            service_details,
        }) => {
            let submission = CustomerSubmission {
                first_name: Some(first_name),
                last_name: Some(last_name),
                email: Some(email),
                phone_number: Some(phone_number),
                address: Some(address),
                service_date: Some(service_date),
                quote_amount: Some(quote_amount),
                service_details: Some(service_details),
            };
            match service.create_customer(submission) {
                Ok(id) => println!("Created customer with client id: {}", id),
                Err(e) => report("Error creating customer", e),
            }
        }
        None => {
            println!("Use --help for available commands");
        }
    }

    Ok(())
}
