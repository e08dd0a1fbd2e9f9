use sovran_render::class;
use sovran_render::{Array, List, Map, StringMappers, Value};

fn main() -> Result<(), sovran_render::MapperError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::TRACE.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mappers = StringMappers::defaults();

    let list = List::new();
    list.push(1);
    list.push(list.clone());
    println!("List in itself:   {}", mappers.render(&list.into()));

    let map = Map::new();
    map.insert("me", map.clone());
    println!("Map in itself:    {}", mappers.render(&map.into()));

    let array = Array::new(&class::OBJECT, 2);
    array.set(0, "first")?;
    array.set(1, array.clone())?;
    println!("Array in itself:  {}", mappers.render(&array.into()));

    let parent = List::new();
    let child = List::new();
    parent.push(child.clone());
    child.push(parent.clone());
    println!("Indirect cycle:   {}", mappers.render(&Value::from(parent)));

    Ok(())
}
