use std::{
    error::Error,
    fmt, io,
    num::{ParseFloatError, ParseIntError},
};

#[derive(Debug)]
pub enum PropagatorErrors {
    IoError(io::Error),
    CsvError(csv::Error),
    ParseFloatError(ParseFloatError),
    ParseIntError(ParseIntError),
    EmptyTrajectory,
    /// Sample at `index` breaks the monotonic ordering of the trajectory epochs.
    UnorderedTrajectory(usize),
    /// Required `.gfc` header keyword is absent.
    MissingGravityHeader(&'static str),
    /// Coefficient record on the given (1-based) line is malformed.
    MalformedGravityRecord(usize),
}

impl fmt::Display for PropagatorErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropagatorErrors::IoError(e) => write!(f, "I/O error: {}", e),
            PropagatorErrors::CsvError(e) => write!(f, "CSV error: {}", e),
            PropagatorErrors::ParseFloatError(e) => write!(f, "Float parsing error: {}", e),
            PropagatorErrors::ParseIntError(e) => write!(f, "Integer parsing error: {}", e),
            PropagatorErrors::EmptyTrajectory => write!(f, "Trajectory contains no states"),
            PropagatorErrors::UnorderedTrajectory(index) => {
                write!(f, "Trajectory epochs are not monotonic at sample {}", index)
            }
            PropagatorErrors::MissingGravityHeader(key) => {
                write!(f, "Gravity model header has no {} entry", key)
            }
            PropagatorErrors::MalformedGravityRecord(line) => {
                write!(f, "Malformed gravity coefficient record on line {}", line)
            }
        }
    }
}

impl Error for PropagatorErrors {}

impl From<io::Error> for PropagatorErrors {
    fn from(err: io::Error) -> Self {
        PropagatorErrors::IoError(err)
    }
}

impl From<csv::Error> for PropagatorErrors {
    fn from(err: csv::Error) -> Self {
        PropagatorErrors::CsvError(err)
    }
}

impl From<ParseFloatError> for PropagatorErrors {
    fn from(err: ParseFloatError) -> Self {
        PropagatorErrors::ParseFloatError(err)
    }
}

impl From<ParseIntError> for PropagatorErrors {
    fn from(err: ParseIntError) -> Self {
        PropagatorErrors::ParseIntError(err)
    }
}
