//! Every piece of text the bot sends, in one place.
//!
//! The render functions are pure so the whole outbound surface can be
//! asserted in tests without a chat in sight.

use crate::telegram::User;
use desk_audit::UsageStats;
use desk_lookup::{Record, SheetInfo};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const INVALID_NUMBER: &str = "❌ Por favor, envía un número de cliente válido.";
pub const INTERNAL_ERROR: &str = "❌ Error interno procesando el mensaje.";
pub const STATS_FORBIDDEN: &str = "⛔ No estás autorizado para ver las estadísticas.";
pub const LOGS_FORBIDDEN: &str = "⛔ No estás autorizado para ver los logs persistentes.";
pub const STATS_UNAVAILABLE: &str = "No hay estadísticas disponibles.";
pub const LOGS_EMPTY: &str = "No se encontraron logs persistentes.";

pub const WELCOME_GROUP: &str = "👋 ¡Hola a todos! Soy **Client Data Bot**.\n\n\
    Para buscar un cliente en este grupo, mencióname o responde a uno de mis mensajes.\n\
    Ejemplo: @mi_bot_username 12345";

pub const HELP: &str = "📖 **Ayuda de Client Data Bot**\n\n\
    **Buscar clientes:**\n\
    • **En chat privado:** Simplemente envía el número de cliente.\n\
    • **En grupos:** Menciona al bot (`@username_del_bot 12345`) o responde a un mensaje del bot con el número.\n\n\
    **Comandos disponibles:**\n\
    • `/start` - Mensaje de bienvenida.\n\
    • `/help` - Muestra esta ayuda.\n\
    • `/info` - Muestra información sobre la base de datos.\n\
    • `/status` - Verifica el estado del bot y la conexión.\n\
    • `/whoami` - Muestra tu información de Telegram.\n\
    • `/stats` - Muestra estadísticas de uso (autorizado).\n\
    • `/plogs` - Muestra los últimos logs de actividad (autorizado).";

/// How many header names `/info` lists before folding the rest.
const SUMMARY_HEADER_LIMIT: usize = 10;

/// Spreadsheet headers with a curated Spanish label. Matched on the
/// lowercased, trimmed header; anything else renders under its own name.
static FIELD_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("client phone number", "Número 📞"),
        ("cliente", "Cliente 🙋🏻‍♀️"),
        ("correo", "Correo ✉️"),
        ("other info", "Otra Información ℹ️"),
    ])
});

pub fn welcome_private(first_name: &str) -> String {
    format!(
        "👋 ¡Hola {first_name}! Bienvenido a **Client Data Bot**.\n\n\
         Envíame un número de cliente y te daré su información.\n\n\
         Usa /help para ver todos los comandos."
    )
}

pub fn sheet_summary(info: &SheetInfo) -> String {
    let mut message = format!(
        "📋 **Spreadsheet Information:**\n\n\
         📊 **Total clients:** {}\n\
         🔍 **Search column:** {}\n\n\
         **Available fields:**\n",
        info.total_records, info.key_column
    );
    if info.headers.is_empty() {
        message.push_str("• No headers found\n");
    } else {
        for header in info.headers.iter().take(SUMMARY_HEADER_LIMIT) {
            message.push_str(&format!("• {header}\n"));
        }
        if info.headers.len() > SUMMARY_HEADER_LIMIT {
            message.push_str(&format!(
                "• ... and {} more fields\n",
                info.headers.len() - SUMMARY_HEADER_LIMIT
            ));
        }
    }
    message.push_str("\n💡 Send any client number to search!");
    message
}

pub fn status_report(sheets_connected: bool, logs_working: bool, total_clients: usize) -> String {
    let sheets_status = if sheets_connected {
        "✅ Connected"
    } else {
        "❌ Disconnected"
    };
    let logs_status = if logs_working { "✅ Working" } else { "❌ Error" };
    format!(
        "🔍 **Bot Status:**\n\n\
         🤖 **Bot:** ✅ Running\n\
         📊 **Google Sheets:** {sheets_status}\n\
         📝 **Persistent Logs:** {logs_status}\n\
         📋 **Total clients:** {total_clients}\n\n\
         🚀 **Ready to search!**"
    )
}

pub fn user_card(user: &User, authorized: bool) -> String {
    let auth_status = if authorized { "✅ Sí" } else { "❌ No" };
    format!(
        "👤 **Tu Información:**\n\n\
         🆔 **User ID:** `{}`\n\
         👤 **Nombre:** {} {}\n\
         📱 **Username:** @{}\n\
         🔑 **Autorizado:** {}",
        user.id,
        user.first_name,
        user.last_name.as_deref().unwrap_or(""),
        user.username.as_deref().unwrap_or("No tienes"),
        auth_status
    )
}

pub fn usage_report(stats: &UsageStats) -> String {
    format!(
        "📈 **Estadísticas de Uso:**\n\n\
         📊 **Logs totales:** {}\n\
         📅 **Actividad de hoy:** {}\n\n\
         🔍 **Búsquedas Totales:** {}\n  \
         - ✅ Exitosas: {}\n  \
         - ❌ Fallidas: {}\n\n\
         👥 **Actividad de Hoy:**\n  \
         - Usuarios únicos: {}\n  \
         - Grupos activos: {}",
        stats.total_entries,
        stats.entries_today,
        stats.total_searches,
        stats.successful_searches,
        stats.failed_searches,
        stats.unique_users_today,
        stats.active_groups_today
    )
}

/// Fixed-width digest of recent audit rows, fenced as code so the columns
/// line up. Rows too short to carry an action are skipped.
pub fn recent_log_lines(entries: &[Vec<String>]) -> String {
    let mut message = String::from("📝 **Últimos 20 Logs Persistentes:**\n\n```\n");
    for entry in entries {
        if let [timestamp, level, _, _, action, ..] = entry.as_slice() {
            message.push_str(&format!("{timestamp:<16} | {level:<15} | {action}\n"));
        }
    }
    message.push_str("```");
    message
}

pub fn record_found(client_number: &str, record: &Record, searcher: &User) -> String {
    let mut response = format!("✅ **Cliente encontrado: `{client_number}`**\n\n");
    for (header, value) in record.fields() {
        let key = header.trim().to_lowercase();
        let label = FIELD_LABELS
            .get(key.as_str())
            .copied()
            .unwrap_or_else(|| header.trim());
        response.push_str(&format!("**{label}:** {value}\n"));
    }
    response.push_str(&format!("\n**Buscado por:** {}", searcher_display(searcher)));
    response
}

pub fn record_missing(client_number: &str) -> String {
    format!("❌ No se encontró información para el cliente: `{client_number}`")
}

fn searcher_display(user: &User) -> String {
    match user.username.as_deref() {
        Some(username) => format!("@{username}"),
        None => user.first_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user(username: Option<&str>) -> User {
        User {
            id: 777,
            first_name: "Ana".to_string(),
            last_name: Some("Vega".to_string()),
            username: username.map(str::to_string),
        }
    }

    fn record(cells: &[(&str, &str)]) -> Record {
        let headers: Vec<String> = cells.iter().map(|(h, _)| h.to_string()).collect();
        let row: Vec<String> = cells.iter().map(|(_, v)| v.to_string()).collect();
        Record::from_row(&headers, &row)
    }

    #[test]
    fn found_record_translates_known_headers() {
        let record = record(&[
            ("Cliente", "Ana Torres"),
            ("Client Phone Number", "555-0100"),
            ("Notas", "VIP"),
        ]);
        let text = record_found("10234", &record, &user(Some("ana_v")));
        assert_eq!(
            text,
            "✅ **Cliente encontrado: `10234`**\n\n\
             **Cliente 🙋🏻‍♀️:** Ana Torres\n\
             **Número 📞:** 555-0100\n\
             **Notas:** VIP\n\n\
             **Buscado por:** @ana_v"
        );
    }

    #[test]
    fn searcher_without_username_shows_first_name() {
        let record = record(&[("Cliente", "Ana Torres")]);
        let text = record_found("10234", &record, &user(None));
        assert!(text.ends_with("**Buscado por:** Ana"));
    }

    #[test]
    fn sheet_summary_folds_headers_past_ten() {
        let info = SheetInfo {
            total_records: 120,
            headers: (1..=12).map(|i| format!("Campo {i}")).collect(),
            key_column: "Cliente ID".to_string(),
        };
        let text = sheet_summary(&info);
        assert!(text.contains("📊 **Total clients:** 120"));
        assert!(text.contains("• Campo 10\n"));
        assert!(!text.contains("• Campo 11\n"));
        assert!(text.contains("• ... and 2 more fields\n"));
        assert!(text.ends_with("💡 Send any client number to search!"));
    }

    #[test]
    fn sheet_summary_without_headers_says_so() {
        let info = SheetInfo {
            total_records: 0,
            headers: Vec::new(),
            key_column: "Unknown".to_string(),
        };
        assert!(sheet_summary(&info).contains("• No headers found\n"));
    }

    #[test]
    fn status_report_reflects_both_probes() {
        let text = status_report(true, false, 42);
        assert!(text.contains("📊 **Google Sheets:** ✅ Connected"));
        assert!(text.contains("📝 **Persistent Logs:** ❌ Error"));
        assert!(text.contains("📋 **Total clients:** 42"));
    }

    #[test]
    fn user_card_marks_authorization() {
        let text = user_card(&user(Some("ana_v")), true);
        assert!(text.contains("🆔 **User ID:** `777`"));
        assert!(text.contains("👤 **Nombre:** Ana Vega"));
        assert!(text.contains("📱 **Username:** @ana_v"));
        assert!(text.ends_with("🔑 **Autorizado:** ✅ Sí"));

        let text = user_card(&user(None), false);
        assert!(text.contains("📱 **Username:** @No tienes"));
        assert!(text.ends_with("🔑 **Autorizado:** ❌ No"));
    }

    #[test]
    fn usage_report_renders_every_counter() {
        let stats = UsageStats {
            total_entries: 40,
            entries_today: 7,
            total_searches: 21,
            successful_searches: 18,
            failed_searches: 3,
            unique_users_today: 4,
            active_groups_today: 2,
        };
        assert_eq!(
            usage_report(&stats),
            "📈 **Estadísticas de Uso:**\n\n\
             📊 **Logs totales:** 40\n\
             📅 **Actividad de hoy:** 7\n\n\
             🔍 **Búsquedas Totales:** 21\n  \
             - ✅ Exitosas: 18\n  \
             - ❌ Fallidas: 3\n\n\
             👥 **Actividad de Hoy:**\n  \
             - Usuarios únicos: 4\n  \
             - Grupos activos: 2"
        );
    }

    #[test]
    fn log_digest_pads_columns_and_skips_short_rows() {
        let entries = vec![
            vec![
                "2024-03-05 10:00".to_string(),
                "INFO".to_string(),
                "777".to_string(),
                "@ana_v (Ana)".to_string(),
                "SEARCH".to_string(),
            ],
            vec!["2024-03-05 10:01".to_string(), "INFO".to_string()],
        ];
        assert_eq!(
            recent_log_lines(&entries),
            "📝 **Últimos 20 Logs Persistentes:**\n\n```\n\
             2024-03-05 10:00 | INFO            | SEARCH\n\
             ```"
        );
    }
}
