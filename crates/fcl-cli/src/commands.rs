use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use fcl_registry::FarmChain;
use fcl_server::{FclServer, ServerConfig};
use fcl_store::{FileKvStore, FileStoreConfig, DEFAULT_LOG_FILE};
use fcl_types::{Consumer, Farmer, FarmerAttributes, Product, Transaction};
use serde::Serialize;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Farmer(args) => cmd_farmer(&cli.data_dir, format, args.action),
        Command::Consumer(args) => cmd_consumer(&cli.data_dir, format, args.action),
        Command::Product(args) => cmd_product(&cli.data_dir, format, args.action),
        Command::Transaction(args) => cmd_transaction(&cli.data_dir, format, args.action),
        Command::Compact(_) => cmd_compact(&cli.data_dir),
        Command::Serve(args) => cmd_serve(&cli.data_dir, args),
    }
}

fn open_store(data_dir: &Path) -> anyhow::Result<FileKvStore> {
    let path = data_dir.join(DEFAULT_LOG_FILE);
    FileKvStore::open(&path, FileStoreConfig::default())
        .with_context(|| format!("failed to open ledger at {}", path.display()))
}

fn cmd_farmer(data_dir: &Path, format: OutputFormat, action: FarmerAction) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let chain = FarmChain::new(&store);
    match action {
        FarmerAction::Register { id, name, email, location } => {
            let mut attrs = FarmerAttributes::new(name, email);
            attrs.location = location;
            let farmer = chain.farmers().register(&id, attrs)?;
            print_registered(format, &farmer)
        }
        FarmerAction::Get { id } => print_one(format, &chain.get_farmer(&id)?),
        FarmerAction::List => print_all(format, &chain.list_farmers()?),
    }
}

fn cmd_consumer(
    data_dir: &Path,
    format: OutputFormat,
    action: ConsumerAction,
) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let chain = FarmChain::new(&store);
    match action {
        ConsumerAction::Register { id, name, location } => {
            print_registered(format, &chain.register_consumer(&id, &name, &location)?)
        }
        ConsumerAction::Get { id } => print_one(format, &chain.get_consumer(&id)?),
        ConsumerAction::List => print_all(format, &chain.list_consumers()?),
    }
}

fn cmd_product(data_dir: &Path, format: OutputFormat, action: ProductAction) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let chain = FarmChain::new(&store);
    match action {
        ProductAction::Register { id, farmer_id, name, price } => print_registered(
            format,
            &chain.register_product(&id, &farmer_id, &name, &price)?,
        ),
        ProductAction::Get { id } => print_one(format, &chain.get_product(&id)?),
        ProductAction::List => print_all(format, &chain.list_products()?),
    }
}

fn cmd_transaction(
    data_dir: &Path,
    format: OutputFormat,
    action: TransactionAction,
) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let chain = FarmChain::new(&store);
    match action {
        TransactionAction::Record { id, farmer_id, consumer_id, amount, timestamp } => {
            let timestamp =
                timestamp.unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
            let tx = chain.record_transaction(&id, &farmer_id, &consumer_id, &amount, &timestamp)?;
            print_registered(format, &tx)
        }
        TransactionAction::Get { id } => print_one(format, &chain.get_transaction(&id)?),
        TransactionAction::List => print_all(format, &chain.list_transactions()?),
    }
}

fn cmd_compact(data_dir: &Path) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let before = store.log_len()?;
    let records = store.compact()?;
    let after = store.log_len()?;
    println!(
        "{} Compacted {}: {} records, {} → {} bytes",
        "✓".green().bold(),
        store.path().display().to_string().bold(),
        records,
        before,
        after
    );
    Ok(())
}

/// Server settings from `--config` (or defaults), with `--bind` applied and
/// `--data-dir` filling in a missing `data_dir`.
fn serve_config(data_dir: &Path, args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if config.data_dir.is_none() {
        config.data_dir = Some(data_dir.to_path_buf());
    }
    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid bind address {bind}"))?;
    }
    Ok(config)
}

fn cmd_serve(data_dir: &Path, args: ServeArgs) -> anyhow::Result<()> {
    let config = serve_config(data_dir, &args)?;
    let server = FclServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One-line human rendering of a record.
trait Describe {
    fn describe(&self) -> String;
}

impl Describe for Farmer {
    fn describe(&self) -> String {
        let mut line = format!("{}  {}", self.id.yellow().bold(), self.name);
        if !self.email.is_empty() {
            line.push_str(&format!("  <{}>", self.email.blue()));
        }
        if let Some(location) = &self.location {
            line.push_str(&format!("  @ {}", location.cyan()));
        }
        line
    }
}

impl Describe for Consumer {
    fn describe(&self) -> String {
        format!("{}  {}  @ {}", self.id.yellow().bold(), self.name, self.location.cyan())
    }
}

impl Describe for Product {
    fn describe(&self) -> String {
        format!(
            "{}  {}  {}  (farmer {})",
            self.id.yellow().bold(),
            self.name,
            self.price.green(),
            self.farmer_id
        )
    }
}

impl Describe for Transaction {
    fn describe(&self) -> String {
        format!(
            "{}  {} → {}  {}  {}",
            self.id.yellow().bold(),
            self.farmer_id,
            self.consumer_id,
            self.amount.green(),
            self.timestamp.dimmed()
        )
    }
}

fn print_registered<T: Describe + Serialize>(format: OutputFormat, record: &T) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Text => {
            println!("{} Registered {}", "✓".green().bold(), record.describe());
            Ok(())
        }
    }
}

fn print_one<T: Describe + Serialize>(format: OutputFormat, record: &T) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Text => {
            println!("{}", record.describe());
            Ok(())
        }
    }
}

fn print_all<T: Describe + Serialize>(format: OutputFormat, records: &[T]) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No records.");
            }
            for record in records {
                println!("{}", record.describe());
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use fcl_registry::RegistryError;
    use fcl_store::StoreError;
    use std::path::PathBuf;

    fn run(dir: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["fcl", "--data-dir", dir.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv).unwrap())
    }

    fn chain_at(dir: &Path) -> FileKvStore {
        open_store(dir).unwrap()
    }

    #[test]
    fn register_persists_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["farmer", "register", "1", "Alice", "--email", "alice@example.com"])
            .unwrap();

        let store = chain_at(dir.path());
        let farmer = FarmChain::new(&store).get_farmer("1").unwrap();
        assert_eq!(farmer.id, "farmer-1");
        assert_eq!(farmer.email, "alice@example.com");
    }

    #[test]
    fn farmer_location_flag_is_stored() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["farmer", "register", "2", "Bob", "--location", "Nakuru"]).unwrap();

        let store = chain_at(dir.path());
        let farmer = FarmChain::new(&store).get_farmer("2").unwrap();
        assert_eq!(farmer.location.as_deref(), Some("Nakuru"));
        assert_eq!(farmer.email, "");
    }

    #[test]
    fn transaction_timestamp_defaults_to_now() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["transaction", "record", "t1", "1", "2", "9.99"]).unwrap();

        let store = chain_at(dir.path());
        let tx = FarmChain::new(&store).get_transaction("t1").unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&tx.timestamp).is_ok());
    }

    #[test]
    fn get_missing_surfaces_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), &["product", "get", "nope"]).unwrap_err();
        let registry_err = err.downcast_ref::<RegistryError>().unwrap();
        assert!(registry_err.is_not_found());
    }

    #[test]
    fn list_and_json_output_succeed() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["consumer", "register", "c1", "Carol", "Eldoret"]).unwrap();
        run(dir.path(), &["consumer", "list"]).unwrap();
        run(dir.path(), &["--format", "json", "consumer", "get", "c1"]).unwrap();
        run(dir.path(), &["product", "list"]).unwrap();
    }

    #[test]
    fn compact_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        for price in ["1.00", "2.00", "3.00"] {
            run(dir.path(), &["product", "register", "p", "1", "Kale", price]).unwrap();
        }
        run(dir.path(), &["compact"]).unwrap();

        let store = chain_at(dir.path());
        assert_eq!(FarmChain::new(&store).get_product("p").unwrap().price, "3.00");
    }

    #[test]
    fn corrupt_ledger_fails_get_and_list() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["farmer", "register", "a", "Alice"]).unwrap();
        run(dir.path(), &["farmer", "register", "b", "Bob"]).unwrap();

        let path = dir.path().join(DEFAULT_LOG_FILE);
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[12] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        for args in [&["farmer", "get", "a"][..], &["farmer", "list"][..]] {
            let err = run(dir.path(), args).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<StoreError>(),
                    Some(StoreError::CrcMismatch { offset: 0, .. })
                ),
                "unexpected error: {err:?}"
            );
        }
    }

    fn serve_args(bind: Option<&str>, config: Option<PathBuf>) -> ServeArgs {
        ServeArgs {
            bind: bind.map(str::to_string),
            config,
        }
    }

    #[test]
    fn serve_uses_data_dir_without_config() {
        let config = serve_config(Path::new("/srv/fcl"), &serve_args(None, None)).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/fcl")));
    }

    #[test]
    fn serve_config_without_data_dir_falls_back_to_flag() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.toml");
        std::fs::write(&file, "bind_addr = \"0.0.0.0:7000\"\n").unwrap();

        let config = serve_config(dir.path(), &serve_args(None, Some(file))).unwrap();
        assert_eq!(config.data_dir.as_deref(), Some(dir.path()));
        assert_eq!(config.bind_addr.port(), 7000);
    }

    #[test]
    fn serve_config_data_dir_wins_and_bind_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.toml");
        std::fs::write(&file, "bind_addr = \"0.0.0.0:7000\"\ndata_dir = \"/var/lib/fcl\"\n")
            .unwrap();

        let args = serve_args(Some("127.0.0.1:9000"), Some(file));
        let config = serve_config(Path::new("/ignored"), &args).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/fcl")));
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn serve_rejects_bad_bind_address() {
        assert!(serve_config(Path::new("."), &serve_args(Some("nowhere"), None)).is_err());
    }
}
