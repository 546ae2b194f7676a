use crate::config::save::save_settings;
use crate::config::types::{Config, Language, UserSettings};
use crate::menu::handlers::{
    run_extension_organizer, run_media_renamer, run_photo_migrator, run_structure_applier,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style(t!("main_menu.title")).cyan().bold());
    println!("{}", style(t!("common.esc_hint")).dim());

    let options = vec![
        t!("main_menu.opt_renamer"),
        t!("main_menu.opt_organizer"),
        t!("main_menu.opt_structure"),
        t!("main_menu.opt_migrator"),
        t!("main_menu.opt_settings"),
        t!("main_menu.exit"),
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("main_menu.prompt"))
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_media_renamer(term, shutdown_signal)?;
            Ok(true)
        }
        Some(1) => {
            run_extension_organizer(term, shutdown_signal)?;
            Ok(true)
        }
        Some(2) => {
            run_structure_applier(term, shutdown_signal)?;
            Ok(true)
        }
        Some(3) => {
            run_photo_migrator(term, shutdown_signal)?;
            Ok(true)
        }
        Some(4) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(5) | None => Ok(false),
        _ => Ok(true),
    }
}

fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;
        println!("{}", style(t!("settings.title")).cyan().bold());

        let options = vec![
            format!(
                "{} ({})",
                t!("settings.language"),
                config.settings.language.display_name()
            ),
            t!("settings.back").to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("settings.prompt"))
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => {
                select_language(term, config)?;
            }
            _ => return Ok(()),
        }
    }
}

fn select_language(term: &Term, config: &mut Config) -> Result<()> {
    let languages = [Language::ZhTw, Language::EnUs];
    let labels: Vec<&str> = languages.iter().map(|l| l.display_name()).collect();
    let current = languages
        .iter()
        .position(|l| *l == config.settings.language)
        .unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("settings.language_prompt"))
        .items(&labels)
        .default(current)
        .interact_on_opt(term)?;

    if let Some(index) = selection {
        // 以磁碟上的最新設定為基底，避免覆寫本次執行期間記下的路徑
        let settings = apply_language(Config::new()?.settings, languages[index]);
        rust_i18n::set_locale(settings.language.as_str());
        save_settings(&settings)?;
        config.settings = settings;
    }

    Ok(())
}

fn apply_language(mut settings: UserSettings, language: Language) -> UserSettings {
    settings.language = language;
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_language_keeps_other_settings() {
        let mut settings = UserSettings::default();
        settings.recent_paths = vec!["/tmp/a".to_string(), "/tmp/b".to_string()];

        let updated = apply_language(settings, Language::EnUs);

        assert_eq!(updated.language, Language::EnUs);
        assert_eq!(updated.recent_paths, vec!["/tmp/a", "/tmp/b"]);
    }
}
