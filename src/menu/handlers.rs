use crate::component::{ExtensionOrganizer, MediaRenamer, PhotoMigrator, StructureApplier};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_media_renamer(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let renamer = MediaRenamer::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = renamer.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_extension_organizer(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let organizer = ExtensionOrganizer::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = organizer.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_structure_applier(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let applier = StructureApplier::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = applier.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_photo_migrator(term: &Term, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let config = Config::new()?;
    let migrator = PhotoMigrator::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = migrator.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
