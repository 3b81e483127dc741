//! Interactive input collection. Re-prompts until each answer parses; the
//! simulation core never sees unvalidated text.

use std::io::{self, BufRead, Write};

use crate::data::scenario::Scenario;
use crate::data::validate::{parse_non_negative_int, parse_positive_float, InvalidInput};

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before all values were entered",
        ));
    }
    Ok(line)
}

/// Ask `question` until `parse` accepts the answer.
pub fn prompt_until_valid<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    question: &str,
    retry_hint: &str,
    parse: F,
) -> io::Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Result<T, InvalidInput>,
{
    loop {
        write!(output, "{question}")?;
        output.flush()?;
        let line = read_line(input)?;
        match parse(&line) {
            Ok(value) => return Ok(value),
            Err(err) => {
                log::debug!("rejected input: {err}");
                writeln!(output, "{retry_hint}")?;
            }
        }
    }
}

/// Fill raised amounts, exchange rate and resale price of `scenario` from `input`.
pub fn collect_scenario_inputs<R: BufRead, W: Write>(
    mut scenario: Scenario,
    input: &mut R,
    output: &mut W,
) -> io::Result<Scenario> {
    writeln!(output, "Enter the amount of bbSOL raised in each tier:")?;
    let mut raised = Vec::with_capacity(scenario.tiers.len());
    for (idx, tier) in scenario.tiers.iter().enumerate() {
        let question = format!("Tier {} - Price: {:.8} bbSOL/token: ", idx + 1, tier.price);
        raised.push(prompt_until_valid(
            input,
            output,
            &question,
            "Please enter a non-negative integer value.",
            parse_non_negative_int,
        )?);
    }
    scenario.raised = raised;

    scenario.exchange_rate = prompt_until_valid(
        input,
        output,
        "\nEnter the value of bbSOL in USD: ",
        "Invalid input! Use only positive numbers.",
        parse_positive_float,
    )?;
    scenario.resale_price = prompt_until_valid(
        input,
        output,
        "Enter the estimated market price of $FRAG in USD: ",
        "Invalid input! Use only positive numbers.",
        parse_positive_float,
    )?;
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reprompts_until_every_value_is_valid() {
        let answers = "10\n-5\nabc\n20\n0\n0\n7\nfree\n150.5\n0.42\n";
        let mut input = Cursor::new(answers.as_bytes());
        let mut output = Vec::new();
        let scenario = collect_scenario_inputs(Scenario::default(), &mut input, &mut output)
            .expect("inputs should be collected");

        assert_eq!(scenario.raised, vec![10, 20, 0, 0, 7]);
        assert_eq!(scenario.exchange_rate, 150.5);
        assert_eq!(scenario.resale_price, 0.42);

        let transcript = String::from_utf8(output).expect("utf8");
        assert_eq!(transcript.matches("non-negative integer").count(), 2);
        assert_eq!(transcript.matches("Use only positive numbers").count(), 1);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut input = Cursor::new("1\n2\n".as_bytes());
        let mut output = Vec::new();
        let err = collect_scenario_inputs(Scenario::default(), &mut input, &mut output)
            .expect_err("input ends early");
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
