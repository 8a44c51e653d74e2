use optf::{define, dispatch, ConversionError};
use tracing_subscriber::EnvFilter;

// A type with many optional settings, filled from option strings.
#[derive(Debug, Default)]
struct MyClass {
    boolean: bool,
    number: f64,
}

impl MyClass {
    fn new<I>(options: I) -> Result<Self, ConversionError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut this = MyClass::default();
        dispatch(options, |name: &str, value: &str| this.set_option(name, value))?;
        Ok(this)
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConversionError> {
        match name {
            "boolean" => define(&mut self.boolean, value),
            "number" => define(&mut self.number, value),
            _ => Ok(()),
        }
    }
}

fn main() -> Result<(), ConversionError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mc = MyClass::new(["boolean=yes", "number=123.45"])?;
    println!("BOOLEAN = {}", mc.boolean);
    println!("NUMBER = {}", mc.number);
    Ok(())
}
