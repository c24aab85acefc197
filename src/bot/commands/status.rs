use crate::bot::commands::{reply, Invocation};
use crate::bot::BotContext;
use crate::provider::ManagedClient;
use tracing::info;

pub const NO_CLIENTS_MESSAGE: &str = "📊 Нет активных VPN клиентов";

const DIGEST_HEADER: &str = "📊 Активные VPN клиенты:\n\n";

/// Telegram's limit for a single text message, in UTF-16 code units
const MAX_MESSAGE_UNITS: usize = 4096;

const ELLIPSIS: &str = "…";

/// /status: numbered digest of all peers
pub async fn handle(ctx: &BotContext, invocation: &Invocation) {
    info!("User {} requested status", invocation.user_id);

    let clients = ctx.provider.list_clients().await;
    if clients.is_empty() {
        reply(ctx, invocation.chat_id, NO_CLIENTS_MESSAGE).await;
        return;
    }

    for page in digest_messages(&clients) {
        reply(ctx, invocation.chat_id, &page).await;
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Longest prefix of `text` that fits in `max` UTF-16 code units.
fn truncate_utf16(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        used += ch.len_utf16();
        if used > max {
            return &text[..idx];
        }
    }
    text
}

/// Room for one entry on a page that also carries the header.
fn max_entry_units() -> usize {
    MAX_MESSAGE_UNITS - utf16_len(DIGEST_HEADER)
}

/// One digest line block. Names too long for a single message are cut.
fn format_entry(index: usize, client: &ManagedClient) -> String {
    let icon = if client.enabled { "✅" } else { "❌" };
    let render = |name: &str| {
        format!(
            "{}. {} {}\n   ID: {}\n   IP: {}\n\n",
            index, icon, name, client.id, client.address
        )
    };

    let entry = render(&client.name);
    let limit = max_entry_units();
    let overflow = utf16_len(&entry).saturating_sub(limit);
    if overflow == 0 {
        return entry;
    }

    let keep = utf16_len(&client.name).saturating_sub(overflow + utf16_len(ELLIPSIS));
    let entry = render(&format!("{}{}", truncate_utf16(&client.name, keep), ELLIPSIS));
    if utf16_len(&entry) <= limit {
        entry
    } else {
        // id or address alone overflow the message
        truncate_utf16(&entry, limit).to_string()
    }
}

/// Render the digest, split at entry boundaries so no message exceeds
/// Telegram's size limit. Every message carries at least one entry and
/// numbering continues across messages.
pub fn digest_messages(clients: &[ManagedClient]) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current = String::from(DIGEST_HEADER);
    let mut has_entries = false;

    for (idx, client) in clients.iter().enumerate() {
        let entry = format_entry(idx + 1, client);
        if has_entries && utf16_len(&current) + utf16_len(&entry) > MAX_MESSAGE_UNITS {
            pages.push(std::mem::take(&mut current));
        }
        current.push_str(&entry);
        has_entries = true;
    }

    if has_entries {
        pages.push(current);
    }
    pages
}
