use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::tables::Table;
use client_core::BackendClient;
use shared::domain::{Commission, CommissionKind, MemberId};
use shared::locale;

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides the project URL from the environment or commission_desk.toml.
    #[arg(long)]
    project_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints the staff roster with current commission values.
    ListMembers,
    /// Prints the service items and their reference prices.
    ListItems,
    /// Writes a commission value for one staff member.
    SetCommission {
        member_id: i64,
        amount: f64,
        /// "money" or "percent".
        kind: String,
    },
    /// Clears the commission columns for one staff member.
    ClearCommission { member_id: i64 },
    /// Verifies that the configured project answers REST requests.
    Check,
    /// Lists the logical-to-physical table name mapping.
    Tables,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = client_core::load_settings();
    if let Some(project_url) = cli.project_url {
        settings.project_url = client_core::normalize_project_url(&project_url);
    }

    // The registry listing is offline; everything else talks to the project.
    let command = match cli.command {
        Command::Tables => {
            for table in Table::ALL {
                println!("{:<16} {}", format!("{table:?}"), table.name());
            }
            return Ok(());
        }
        command => command,
    };

    let client = BackendClient::new(&settings)?;

    match command {
        Command::ListMembers => {
            let members = client.list_members().await?;
            for row in &members {
                let commission = row.commission();
                println!(
                    "{:>6}  {:<28}  {}",
                    row.id.0,
                    row.full_name,
                    locale::format_commission(commission)
                );
            }
            println!("{} members", members.len());
        }
        Command::ListItems => {
            let items = client.list_service_items().await?;
            for row in &items {
                let item = row.item();
                match item.reference_price() {
                    Some(price) => println!(
                        "{:>6}  {:<28}  {} {}",
                        row.id.0,
                        item.name,
                        locale::format_grouped(price),
                        locale::CURRENCY_SYMBOL
                    ),
                    None => println!("{:>6}  {:<28}  (no price)", row.id.0, item.name),
                }
            }
            println!("{} service items", items.len());
        }
        Command::SetCommission {
            member_id,
            amount,
            kind,
        } => {
            let kind = if kind.eq_ignore_ascii_case("percent") {
                CommissionKind::Percent
            } else {
                CommissionKind::Money
            };
            let commission = Commission::new(amount, kind);
            client
                .update_member_commission(MemberId(member_id), commission)
                .await?;
            println!(
                "updated member_id={} to {}",
                member_id,
                locale::format_commission(commission)
            );
        }
        Command::ClearCommission { member_id } => {
            client.clear_member_commission(MemberId(member_id)).await?;
            println!("cleared commission for member_id={member_id}");
        }
        Command::Check => {
            client.check_connection().await?;
            println!("backend reachable at {}", settings.project_url);
        }
        Command::Tables => {}
    }

    Ok(())
}
