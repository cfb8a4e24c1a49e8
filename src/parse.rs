//! Turning raw trajectory lines into typed records.
//!
//! Each line is expected to hold exactly five comma-separated fields:
//! `run,fitness1,solution1,fitness2,solution2`. Anything else is dropped without complaint, since
//! a single malformed row of telemetry must not abort a whole batch.

use csv_core::{ReadFieldResult, Reader, ReaderBuilder};
use smallvec::SmallVec;
use std::str;

/// Number of fields in a well-formed trajectory line.
pub const FIELD_COUNT: usize = 5;

/// Value of the run-index field on a header line.
pub const HEADER_TOKEN: &str = "Run";

type Fields = SmallVec<[String; FIELD_COUNT]>;

/// One visited solution together with its fitness.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Observation {
    /// Objective value reported for this solution.
    pub fitness: i64,
    /// The solution as a string of `'0'` and `'1'` symbols.
    pub solution: String,
}

/// A move from one solution to the next within a single run.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Transition {
    /// Which run of the algorithm this transition belongs to.
    pub run: i64,
    /// Where the move started.
    pub from: Observation,
    /// Where the move ended.
    pub to: Observation,
}

/// Splits lines into fields, reusing one CSV reader and one field buffer for every line.
///
/// ```
/// use stn_partition::parse::LineParser;
///
/// let mut parser = LineParser::new();
/// let t = parser.transition("3,10,0110,8,0111 ").unwrap();
/// assert_eq!(t.run, 3);
/// assert_eq!((t.from.fitness, t.from.solution.as_str()), (10, "0110"));
/// assert_eq!((t.to.fitness, t.to.solution.as_str()), (8, "0111"));
///
/// assert!(parser.transition("Run,Fitness1,Solution1,Fitness2,Solution2").is_none());
/// assert!(parser.transition("x,y,z").is_none());
/// ```
pub struct LineParser {
    reader: Reader,
    field: Vec<u8>,
}

impl Default for LineParser {
    fn default() -> Self {
        LineParser::new()
    }
}

impl LineParser {
    /// Creates a parser for comma-delimited lines.
    pub fn new() -> Self {
        LineParser {
            reader: ReaderBuilder::new().delimiter(b',').quoting(false).build(),
            field: vec![0; 256],
        }
    }

    /// Parses a trajectory line, or returns `None` if the line is a header or is malformed.
    pub fn transition(&mut self, line: &str) -> Option<Transition> {
        let fields = self.split(line)?;
        if fields[0] == HEADER_TOKEN {
            return None;
        }
        let run = parse_int(&fields[0])?;
        let [from, to] = observations(&fields)?;
        Some(Transition { run, from, to })
    }

    /// Parses a line for the reference pool.
    ///
    /// This accepts the same shape as [`LineParser::transition`], but the run-index field is not
    /// inspected at all.
    pub fn observations(&mut self, line: &str) -> Option<[Observation; 2]> {
        let fields = self.split(line)?;
        observations(&fields)
    }

    /// Returns the fields of the first record on the line, or `None` if the line does not have
    /// exactly [`FIELD_COUNT`] fields.
    fn split(&mut self, line: &str) -> Option<Fields> {
        self.reader.reset();
        let mut input = line.as_bytes();
        let mut len = 0;
        let mut fields = Fields::new();
        loop {
            let (result, nin, nout) = self.reader.read_field(input, &mut self.field[len..]);
            input = &input[nin..];
            len += nout;
            match result {
                // The next call sees an empty slice, which the reader treats as end of input.
                ReadFieldResult::InputEmpty => {}
                ReadFieldResult::OutputFull => {
                    // Solutions can be thousands of bits long.
                    let grown = self.field.len() * 2;
                    self.field.resize(grown, 0);
                }
                ReadFieldResult::Field { record_end } => {
                    fields.push(str::from_utf8(&self.field[..len]).ok()?.to_owned());
                    len = 0;
                    if record_end {
                        break;
                    }
                }
                ReadFieldResult::End => break,
            }
        }

        if fields.len() == FIELD_COUNT {
            Some(fields)
        } else {
            None
        }
    }
}

fn observations(fields: &Fields) -> Option<[Observation; 2]> {
    let from = Observation {
        fitness: parse_int(&fields[1])?,
        solution: parse_solution(&fields[2])?,
    };
    let to = Observation {
        fitness: parse_int(&fields[3])?,
        solution: parse_solution(&fields[4])?,
    };
    Some([from, to])
}

// Positions are byte offsets from here on, so anything but '0' and '1' is rejected.
fn parse_solution(field: &str) -> Option<String> {
    let solution = field.trim_end();
    if solution.bytes().all(|b| b == b'0' || b == b'1') {
        Some(solution.to_owned())
    } else {
        None
    }
}

fn parse_int(field: &str) -> Option<i64> {
    field.trim().parse().ok()
}
