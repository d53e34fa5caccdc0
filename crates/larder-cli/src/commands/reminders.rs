//! Reminder command implementations (list, close, clear)

use anyhow::Result;
use larder_core::{db::Database, models::Reminder};

fn print_reminder(reminder: &Reminder) {
    let icon = if reminder.message.starts_with("ALERT") {
        "❌"
    } else {
        "⚠️"
    };
    let closed_mark = if reminder.closed { " (closed)" } else { "" };

    println!(
        "   {} [{}] {}{}",
        icon, reminder.id, reminder.item_name, closed_mark
    );
    println!("      {}", reminder.message);
    println!(
        "      Created: {}",
        reminder.created_at.format("%Y-%m-%d %H:%M")
    );
}

pub fn cmd_reminders_list(db: &Database, include_closed: bool) -> Result<()> {
    let reminders = db.list_reminders()?;

    if reminders.active.is_empty() && !include_closed {
        println!("✅ No active reminders. Nothing is about to expire!");
        return Ok(());
    }

    println!();
    println!("⏰ Reminders");
    println!("   ─────────────────────────────────────────────────────────────");

    for reminder in &reminders.active {
        print_reminder(reminder);
        println!();
    }

    if include_closed && !reminders.closed.is_empty() {
        println!("   Closed");
        println!("   ─────────────────────────────────────────────────────────────");
        for reminder in &reminders.closed {
            print_reminder(reminder);
            println!();
        }
    }

    println!("   Close with: larder reminders close <id>");

    Ok(())
}

pub fn cmd_reminders_close(db: &Database, id: i64) -> Result<()> {
    if !db.close_reminder(id)? {
        anyhow::bail!("Reminder {} not found", id);
    }
    println!("✅ Closed reminder {}", id);
    Ok(())
}

pub fn cmd_reminders_clear(db: &Database) -> Result<()> {
    let deleted = db.clear_closed_reminders()?;
    println!("🗑️  Deleted {} closed reminder(s)", deleted);
    Ok(())
}
