use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, CellAlignment, Table};
use tambola_core::{GameConfig, Ticket, TicketGenerator};

pub fn ticket_table(ticket: &Ticket) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    for row in ticket.rows() {
        table.add_row(
            row.iter()
                .map(|cell| cell.map(|n| n.to_string()).unwrap_or_default())
                .collect::<Vec<String>>(),
        );
    }
    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Right);
    }

    table
}

pub fn print_tickets(config: &GameConfig, count: usize, json: bool) -> Result<()> {
    let generator = TicketGenerator::new(config.max_ticket_attempts);
    let tickets = (0..count)
        .map(|_| generator.generate())
        .collect::<tambola_core::Result<Vec<Ticket>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
        return Ok(());
    }

    for (i, ticket) in tickets.iter().enumerate() {
        println!("Ticket #{}", i + 1);
        println!("{}", ticket_table(ticket));
    }

    Ok(())
}
