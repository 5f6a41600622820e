//! Command-line front end for the explorer core.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sui_lens::args::{Args, Command};
use sui_lens::contract::{dev_inspect_call, parse_arg, read_functions};
use sui_lens::journey::extract_stages;
use sui_lens::logo_cache::{static_logo, token_icon, FsKvStore, LogoCache, SystemClock};
use sui_lens::market::CoinGeckoProvider;
use sui_lens::parser::parse_detailed;
use sui_lens::rpc::RpcClient;
use sui_lens::types::DetailedTransaction;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let client = RpcClient::new(args.endpoint());

    match args.command {
        Command::Tx { digest, json } => {
            let raw = client.fetch_transaction(&digest)?;
            let tx = parse_detailed(&raw);
            if json {
                println!("{}", serde_json::to_string_pretty(&tx)?);
            } else {
                print_detailed(&tx);
            }
        }
        Command::Journey { digest } => {
            let raw = client.fetch_transaction(&digest)?;
            let tx = parse_detailed(&raw);
            for stage in extract_stages(&tx.base, tx.move_calls.len()) {
                println!("Stage {}: {} — {}", stage.stage, stage.title, stage.subtitle);
                println!("  {}", stage.description);
                println!("  {}", stage.narrative);
            }
        }
        Command::Inspect { package } => {
            let modules = client.fetch_normalized_modules(&package)?;
            let functions = read_functions(&modules);
            if functions.is_empty() {
                println!("No public read functions found in {}", package);
            }
            for function in functions {
                println!("{}", function.signature());
            }
        }
        Command::Call {
            package,
            module,
            function,
            args: arg_texts,
            sender,
        } => {
            let modules = client
                .fetch_normalized_modules(&package)
                .context("loading package modules")?;
            let Some(target) = read_functions(&modules)
                .into_iter()
                .find(|f| f.module == module && f.name == function)
            else {
                bail!("no public read function {}::{} in {}", module, function, package);
            };
            if arg_texts.len() != target.params.len() {
                bail!(
                    "{} expects {} argument(s), got {}",
                    target.signature(),
                    target.params.len(),
                    arg_texts.len()
                );
            }
            let parsed: Vec<_> = target
                .params
                .iter()
                .zip(&arg_texts)
                .map(|(param, text)| parse_arg(text, param.kind))
                .collect::<Result<_>>()?;
            for line in dev_inspect_call(&client, &sender, &package, &target, &parsed)? {
                println!("{}", line);
            }
        }
        Command::Logo { symbol } => {
            let store = FsKvStore::default_location()?;
            let mut cache = LogoCache::new(CoinGeckoProvider::new(), store, SystemClock);
            match cache.get_logo(&symbol) {
                Some(url) => println!("{} {}", token_icon(Some(&symbol.to_uppercase())), url),
                None => match static_logo(&symbol) {
                    Some(url) => println!("{} {} (static fallback)", token_icon(Some(&symbol.to_uppercase())), url),
                    None => println!("{} no logo found for {}", token_icon(None), symbol),
                },
            }
            if let Some(market) = cache.get_price_data(&symbol) {
                if let Some(price) = market.current_price {
                    println!("{} (${:.4})", market.name, price);
                }
            }
        }
    }
    Ok(())
}

fn print_detailed(tx: &DetailedTransaction) {
    let base = &tx.base;
    println!("Digest:    {}", base.digest);
    println!("Status:    {:?}", base.status);
    println!("Sender:    {}", base.sender);
    println!("Time:      {}", base.timestamp);
    println!(
        "Action:    {} ({})",
        base.summary.main_action, base.summary.description
    );
    println!(
        "Gas:       {} SUI ({} MIST)",
        base.gas_used.total_sui, base.gas_used.total
    );

    if !base.recipients.is_empty() {
        println!("Recipients:");
        for recipient in &base.recipients {
            println!("  {}", recipient);
        }
    }
    if !base.balance_changes.is_empty() {
        println!("Balance changes:");
        for change in &base.balance_changes {
            let sign = if change.is_positive { "+" } else { "-" };
            println!(
                "  {}{} {} ({})",
                sign, change.amount, change.coin_type, change.owner
            );
        }
    }
    if !tx.move_calls.is_empty() {
        println!("Move calls:");
        for call in &tx.move_calls {
            println!("  {} ({})", call.description, call.package);
        }
    }
    if !tx.operations.is_empty() {
        println!("Operations:");
        for op in &tx.operations {
            println!("  {}", op.description);
        }
    }
    if !tx.object_changes.is_empty() {
        println!("Object changes:");
        for change in &tx.object_changes {
            println!(
                "  {} {} {}",
                change.change_type, change.object_type_details.main_type, change.object_id_short
            );
        }
    }
    if !tx.events.is_empty() {
        println!("Events:");
        for event in &tx.events {
            println!("  {} ({})", event.description, event.event_type);
        }
    }
}
