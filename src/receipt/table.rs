//! Receipt table rendering

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};

use super::{Receipt, ReceiptError};

pub(super) fn write_receipt(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Quantity", "Unit Price", "Total"]);

    for item in receipt.items() {
        builder.push_record([
            item.product().name().to_string(),
            item.quantity().to_string(),
            item.unit_price().to_string(),
            item.total_price().to_string(),
        ]);
    }

    let discount_start = receipt.items().len() + 1;

    for discount in receipt.discounts() {
        builder.push_record([
            discount.description().to_string(),
            String::new(),
            String::new(),
            discount.amount().to_string(),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    if !receipt.discounts().is_empty() {
        theme.insert_horizontal_line(discount_start, separator);
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..4), Alignment::right());

    for row in discount_start..discount_start + receipt.discounts().len() {
        table.modify((row, 3), Color::FG_GREEN);
    }

    writeln!(out, "\n{table}")?;

    write_summary(out, receipt)
}

fn write_summary(out: &mut impl io::Write, receipt: &Receipt<'_>) -> Result<(), ReceiptError> {
    let savings = receipt.savings()?;

    let lines = [
        ("Subtotal:", receipt.subtotal().to_string()),
        ("Savings:", savings.to_string()),
        ("Total:", receipt.total_price().to_string()),
    ];

    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in lines {
        writeln!(out, " {label:<label_width$} {value:>value_width$}")?;
    }

    writeln!(out)?;

    Ok(())
}
