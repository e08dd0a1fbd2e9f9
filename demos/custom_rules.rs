use rust_decimal::Decimal;
use sovran_render::class;
use sovran_render::{
    quote_string, List, Map, MapperError, MutableStringMappers, StringMappers, TypeKey, Value,
};

fn main() -> Result<(), MapperError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // A failing check's actual value
    let order = Map::new();
    order.insert("id", 1_048_576);
    order.insert("total", Decimal::new(129_995, 2));
    order.insert("note", Value::Null);
    order.insert("tags", ["rush", "gift"].into_iter().collect::<List>());
    let order = Value::from(order);

    println!("Defaults:   {}", StringMappers::defaults().render(&order));

    // Quote strings and spell out nulls
    let mut mappers = MutableStringMappers::from(StringMappers::defaults());
    mappers
        .put(&class::STRING, |value: &Value| match value {
            Value::String(s) => quote_string(s),
            other => other.to_string(),
        })
        .put(TypeKey::Null, |_: &Value| "<none>".to_string());
    let mappers = mappers.to_immutable();

    println!("Customized: {}", mappers.render(&order));

    // The string rule replaced the default one
    let rule = mappers.rule_for(&class::STRING)?;
    println!("String rule: {rule:?}");
    println!("All rules:  {mappers}");

    // Removing a rule is an error to look up, but rendering never fails
    let mut stripped = MutableStringMappers::from(&mappers);
    stripped.remove(&class::INT);
    match stripped.to_immutable().rule_for(&class::INT) {
        Ok(_) => println!("int rule still present"),
        Err(MapperError::KeyNotFound(key)) => println!(
            "No rule for {key}; renders as {}",
            stripped.render(&Value::from(1_048_576))
        ),
        Err(e) => return Err(e),
    }

    Ok(())
}
