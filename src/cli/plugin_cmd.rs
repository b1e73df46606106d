//! Plugin inspection commands

use anyhow::Result;
use clap::Subcommand;

use super::app::host_registry;
use super::output::Output;
use crate::config::Config;
use crate::options::{OptionRegistry, Options};
use crate::plugin::{Checkers, Listeners, Plugin, PluginTypeManager, Registry, ReportFormatters};

#[derive(Subcommand)]
pub enum PluginCommands {
    /// List registered plugins across all namespaces
    List,

    /// Show one plugin's details
    Show {
        /// Registered plugin name
        name: String,
    },

    /// Show registered options and their effective values
    Options,
}

pub fn run(cmd: PluginCommands, output: &Output) -> Result<()> {
    let registry = host_registry();
    match cmd {
        PluginCommands::List => list_plugins(&registry, output),
        PluginCommands::Show { name } => show_plugin(&registry, output, &name),
        PluginCommands::Options => show_options(&registry, output),
    }
}

fn list_plugins(registry: &dyn Registry, output: &Output) -> Result<()> {
    let mut checkers = Checkers::new(registry);
    let mut listeners = Listeners::new(registry);
    let mut formatters = ReportFormatters::new(registry);

    checkers.load_plugins()?;
    listeners.load_plugins()?;
    formatters.load_plugins()?;

    let sections: [&PluginTypeManager; 3] = [&checkers, &listeners, &formatters];

    if output.is_json() {
        let mut items = Vec::new();
        for manager in sections {
            for name in manager.names() {
                if let Some(plugin) = manager.get(name) {
                    items.push(serde_json::json!({
                        "namespace": manager.namespace(),
                        "name": plugin.name(),
                        "version": plugin.version()?,
                        "input": plugin.input(),
                    }));
                }
            }
        }
        output.data(&items);
        return Ok(());
    }

    let total: usize = sections.iter().map(|manager| manager.names().len()).sum();
    if total == 0 {
        println!("No plugins registered.");
        return Ok(());
    }

    println!("{:<24} {:<16} {:<10} INPUT", "NAME", "NAMESPACE", "VERSION");
    println!("{}", "-".repeat(70));
    for manager in sections {
        for name in manager.names() {
            if let Some(plugin) = manager.get(name) {
                println!(
                    "{:<24} {:<16} {:<10} {}",
                    plugin.name(),
                    manager.namespace(),
                    plugin.version()?,
                    plugin.input()
                );
            }
        }
    }
    output.blank();
    println!("{} plugin(s) registered", total);

    Ok(())
}

fn find_plugin(
    registry: &dyn Registry,
    name: &str,
) -> Option<(&'static str, std::sync::Arc<Plugin>)> {
    let checkers = Checkers::new(registry);
    if let Some(plugin) = checkers.get(name) {
        return Some((Checkers::NAMESPACE, plugin.clone()));
    }
    let listeners = Listeners::new(registry);
    if let Some(plugin) = listeners.get(name) {
        return Some((Listeners::NAMESPACE, plugin.clone()));
    }
    let formatters = ReportFormatters::new(registry);
    if let Some(plugin) = formatters.get(name) {
        return Some((ReportFormatters::NAMESPACE, plugin.clone()));
    }
    None
}

fn show_plugin(registry: &dyn Registry, output: &Output, name: &str) -> Result<()> {
    let Some((namespace, plugin)) = find_plugin(registry, name) else {
        anyhow::bail!("Plugin not found: {}", name);
    };

    // Collect what this one plugin contributes to the option registry.
    let mut options = OptionRegistry::new();
    plugin.register_options(&mut options)?;
    let identity = &options.registered_plugins()[0];

    if output.is_json() {
        output.data(&serde_json::json!({
            "name": plugin.name(),
            "namespace": namespace,
            "declared_name": identity.name,
            "version": identity.version,
            "input": plugin.input(),
            "options": options.options(),
        }));
        return Ok(());
    }

    println!("Plugin: {}", plugin.name());
    println!("Namespace: {}", namespace);
    println!("Declared name: {}", identity.name);
    println!("Version: {}", identity.version);
    println!("Input: {}", plugin.input());
    if options.options().is_empty() {
        println!("Options: none");
    } else {
        println!("Options:");
        for spec in options.options() {
            match &spec.default {
                Some(default) => println!("  --{} (default: {})", spec.long, default),
                None => println!("  --{}", spec.long),
            }
            if !spec.help.is_empty() {
                println!("      {}", spec.help);
            }
        }
    }

    Ok(())
}

fn show_options(registry: &dyn Registry, output: &Output) -> Result<()> {
    let mut checkers = Checkers::new(registry);
    let mut listeners = Listeners::new(registry);
    let mut formatters = ReportFormatters::new(registry);

    let mut option_registry = OptionRegistry::new();
    checkers.register_options(&mut option_registry)?;
    listeners.register_options(&mut option_registry)?;
    formatters.register_options(&mut option_registry)?;

    // Effective values come from the configuration file stack and travel to
    // the plugins the same way the analysis run would hand them over.
    let cwd = std::env::current_dir()?;
    let options: Options = Config::load(&cwd)?.into_options();
    checkers.provide_options(&option_registry, &options, &[])?;
    listeners.provide_options(&option_registry, &options, &[])?;
    formatters.provide_options(&option_registry, &options, &[])?;

    if output.is_json() {
        let specs: Vec<_> = option_registry
            .options()
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "long": spec.long,
                    "help": spec.help,
                    "default": spec.default,
                    "effective": options.get(&spec.long),
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "options": specs,
            "plugins": option_registry.registered_plugins(),
        }));
        return Ok(());
    }

    if option_registry.options().is_empty() {
        println!("No options registered.");
    } else {
        println!("{:<28} {:<12} {:<12} HELP", "OPTION", "DEFAULT", "EFFECTIVE");
        println!("{}", "-".repeat(76));
        for spec in option_registry.options() {
            let default = spec.default.clone().unwrap_or_else(|| "-".to_string());
            let effective = options
                .get(&spec.long)
                .map(|value| value.to_string())
                .unwrap_or_else(|| default.clone());
            println!(
                "{:<28} {:<12} {:<12} {}",
                format!("--{}", spec.long),
                default,
                effective,
                spec.help
            );
        }
    }

    output.blank();
    println!("Registered by:");
    for identity in option_registry.registered_plugins() {
        println!(
            "  {} ({} {})",
            identity.entry_point, identity.name, identity.version
        );
    }

    Ok(())
}
