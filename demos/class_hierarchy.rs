use sovran_render::class::{self, Class, Type};
use sovran_render::{MutableStringMappers, Object, Value};
use std::fmt;

// Vehicle
// └── Car ── implements Insured
//     └── Taxi
static VEHICLE: Class = Class::new("Vehicle", Some(&class::OBJECT), &[]);
static INSURED: Class = Class::new("Insured", None, &[]);
static CAR: Class = Class {
    name: "Car",
    primitive: false,
    superclass: Some(&VEHICLE),
    interfaces: &[&INSURED],
};
static TAXI: Class = Class::new("Taxi", Some(&CAR), &[]);

#[derive(Debug)]
struct Taxi {
    plate: &'static str,
}

impl fmt::Display for Taxi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Taxi {}", self.plate)
    }
}

impl Object for Taxi {
    fn class(&self) -> &'static Class {
        &TAXI
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let taxi = Value::object(Taxi { plate: "NYC-42" });
    let mut mappers = MutableStringMappers::new();

    println!("No rules:       {}", mappers.render(&taxi));

    mappers.put(&VEHICLE, |value: &Value| format!("vehicle <{value}>"));
    println!("Vehicle rule:   {}", mappers.render(&taxi));

    // Insured is two edges from Taxi, Vehicle too; the superclass branch
    // is searched first.
    mappers.put(&INSURED, |value: &Value| format!("insured <{value}>"));
    println!("Plus Insured:   {}", mappers.render(&taxi));

    mappers.put(&TAXI, |value: &Value| format!("taxi <{value}>"));
    println!("Exact rule:     {}", mappers.render(&taxi));

    let mappers = mappers.to_immutable();
    if let Some(found) = mappers.ancestor_match(Type::Class(&TAXI)) {
        println!("Closest ancestor rule is {} edge(s) up", found.depth);
    }
}
