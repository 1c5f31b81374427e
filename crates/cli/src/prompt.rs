//! Terminal prompt collaborator.

use std::io::{self, BufRead, Write};

use restock_core::ValidationError;
use restock_infra::SalesInput;
use restock_sales::SALES_SEPARATOR;

/// Reads sales lines from an operator, printing instructions before each read.
pub struct TerminalInput<R, W> {
    reader: R,
    writer: W,
    product_lines: Vec<String>,
}

impl<R, W> TerminalInput<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(reader: R, writer: W, product_lines: Vec<String>) -> Self {
        Self {
            reader,
            writer,
            product_lines,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn example(&self) -> String {
        (1..=self.product_lines.len())
            .map(|i| (i * 10).to_string())
            .collect::<Vec<_>>()
            .join(&SALES_SEPARATOR.to_string())
    }

    fn print_instructions(&mut self) -> io::Result<()> {
        let example = self.example();
        writeln!(self.writer, "Please enter sales data from the last market.")?;
        writeln!(
            self.writer,
            "Data should be {} numbers ({}), separated by commas.",
            self.product_lines.len(),
            self.product_lines.join(", ")
        )?;
        writeln!(self.writer, "Example: {example}\n")?;
        write!(self.writer, "Enter your data here: ")?;
        self.writer.flush()
    }
}

impl<R, W> SalesInput for TerminalInput<R, W>
where
    R: BufRead,
    W: Write,
{
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.print_instructions()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            writeln!(self.writer)?;
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn reject(&mut self, error: &ValidationError) {
        // Prompt output is best effort; a broken terminal surfaces on the next read.
        let _ = writeln!(self.writer, "Invalid data: {error}, please try again.\n");
    }
}
