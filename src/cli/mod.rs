//! CLI command implementations besides serving.
//!
//! Provides subcommand handlers for:
//! - `cookbook routes`: every operation with its route, remote path and inputs
//! - `cookbook config show|init|path`: configuration management

use anyhow::Result;
use colored::Colorize;

use crate::catalog::{self, Access, Section};
use crate::config;
use crate::transport::sdk;

// ---------------------------------------------------------------------------
// cookbook routes
// ---------------------------------------------------------------------------

/// Print the operation table, one section at a time.
pub fn run_routes() -> Result<()> {
    println!("{}", "Cook Book Operations".bold().cyan());
    println!("{}", "=".repeat(78));

    let sections = Section::PAGE_ORDER.into_iter().chain([Section::Objects]);
    for section in sections {
        println!();
        if section == Section::Objects {
            println!("{} {}", section.title().bold().cyan(), "(not on page)".dimmed());
        } else {
            println!("{}", section.title().bold().cyan());
        }
        println!(
            "  {:<36} {:<28} {:<7} {:<4} Inputs",
            "Route", "Remote", "Handle", "Args"
        );
        println!("  {}", "-".repeat(76));

        for (i, op) in catalog::by_section(section).enumerate() {
            let inputs = op.inputs().collect::<Vec<_>>().join(",");
            let line = format!(
                "  {:<36} {:<28} {:<7} {:<4} {}",
                truncate(&route_label(op.route, op.access), 36),
                truncate(op.remote, 28),
                access_label(op.access),
                arity_label(op.sdk.method),
                inputs,
            );
            if i % 2 == 0 {
                println!("{line}");
            } else {
                println!("{}", line.dimmed());
            }
        }
    }

    println!();
    println!(
        "{} {} operations",
        "Total:".bold(),
        catalog::all().len()
    );
    Ok(())
}

fn route_label(route: &str, access: Access) -> String {
    if access == Access::RouteSession {
        format!("/{route}[/sid]")
    } else {
        format!("/{route}")
    }
}

/// Positional argument count of the client library method, `?` if unknown.
fn arity_label(method: &str) -> String {
    sdk::arity(method).map_or_else(|| "?".to_string(), |n| n.to_string())
}

fn access_label(access: Access) -> colored::ColoredString {
    match access {
        Access::Anonymous => "anon".normal(),
        Access::Credentials => "creds".yellow(),
        Access::Login => "login".green(),
        Access::SessionField => "session".blue(),
        Access::RouteSession => "route".blue(),
    }
}

// ---------------------------------------------------------------------------
// cookbook config show | init | path
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Cook Book Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.cookbook/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.cookbook/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".cookbook.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            ".cookbook.toml (not found)".dimmed()
        );
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "COOKBOOK_* environment variables".dimmed()
    );
    println!("  {} {}", "·".dimmed(), "command-line flags".dimmed());

    Ok(())
}

/// Initialize a default config file at `~/.cookbook/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point the cook book at your node.".dimmed()
    );
    Ok(())
}

/// Print where the global config file lives.
pub fn run_config_path() -> Result<()> {
    match config::global_config_file() {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", "could not determine home directory".yellow()),
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
