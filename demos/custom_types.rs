//! Rendering caller-defined types through a custom formatter.
//!
//! The `{|payload}` part of a placeholder is handed to the formatter
//! verbatim: here it selects a float precision or a strftime pattern.
//!
//! Run with: cargo run --example custom_types

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::error::Error;
use std::fmt::Write;
use tagfmt::{
    args, format_to_string_with, format_to_writer_with_options, Arg, Capture, CustomArg,
    CustomFormatter, CustomOutput, CustomTag, FormatOptions, FormatSpec,
};

const FLOAT: CustomTag = CustomTag(1);
const POINT: CustomTag = CustomTag(2);
const TIMESTAMP: CustomTag = CustomTag(3);

struct Point {
    x: i32,
    y: i32,
}

impl Capture for Point {
    fn capture(&self) -> Arg<'_> {
        Arg::Custom(CustomArg::new(POINT, self))
    }
}

struct Showcase {
    default_time_format: &'static str,
}

impl Showcase {
    fn float(value: f64, payload: Option<&str>, out: &mut CustomOutput<'_, '_>) -> bool {
        let precision = payload
            .and_then(|p| p.strip_prefix('.'))
            .and_then(|p| p.parse::<usize>().ok());
        match precision {
            Some(precision) => write!(out, "{value:.precision$}").is_ok(),
            None => write!(out, "{value}").is_ok(),
        }
    }

    fn timestamp(&self, when: &DateTime<Local>, payload: Option<&str>, out: &mut CustomOutput<'_, '_>) -> bool {
        let pattern = payload.unwrap_or(self.default_time_format);
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return false;
        }
        // Long patterns are cut at the scratch capacity.
        let _ = write!(out, "{}", when.format(pattern));
        true
    }
}

impl CustomFormatter for Showcase {
    fn format_custom<'a>(
        &self,
        arg: CustomArg<'a>,
        spec: &FormatSpec<'a>,
        out: &mut CustomOutput<'_, 'a>,
    ) -> bool {
        let payload = spec.custom_str();
        match arg.tag() {
            FLOAT => match arg.downcast_ref::<f64>() {
                Some(value) => Self::float(*value, payload, out),
                None => false,
            },
            POINT => match arg.downcast_ref::<Point>() {
                Some(p) => write!(out, "{{{},{}}}", p.x, p.y).is_ok(),
                None => false,
            },
            TIMESTAMP => match arg.downcast_ref::<DateTime<Local>>() {
                Some(when) => self.timestamp(when, payload, out),
                None => false,
            },
            _ => false,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let showcase = Showcase {
        default_time_format: "%a %b %e %H:%M:%S %Y",
    };
    let options = FormatOptions::default();
    let mut stdout = std::io::stdout().lock();

    let now = Local::now();
    format_to_writer_with_options(
        &mut stdout,
        "custom formatting: now is {|%Y-%m-%d %H:%M:%S} (default format: {0})\n",
        args![CustomArg::new(TIMESTAMP, &now)],
        &options,
        &showcase,
    )?;

    let (x, y) = (1.5f32, 2.25f64);
    let sum = f64::from(x) + y;
    format_to_writer_with_options(
        &mut stdout,
        "float {} + double {} = {|.10}\n",
        args![
            CustomArg::new(FLOAT, &f64::from(x)),
            CustomArg::new(FLOAT, &y),
            CustomArg::new(FLOAT, &sum)
        ],
        &options,
        &showcase,
    )?;

    let point = Point { x: 1, y: 2 };
    format_to_writer_with_options(
        &mut stdout,
        "point: {} padded: [{:10}] [{:-10}]\n",
        args![point, point, point],
        &options,
        &showcase,
    )?;

    // Without a formatter, custom arguments are reported instead of rendered.
    let text = tagfmt::format_to_string("unknown type {}\n", args![point])?;
    print!("{text}");

    let text = format_to_string_with("bad pattern: {|%Q}\n", args![CustomArg::new(TIMESTAMP, &now)], &showcase)?;
    print!("{text}");

    Ok(())
}
