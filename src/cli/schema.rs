//! JSON schema command

use ravencheck::*;

pub fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: question, analysis, report, config");
            Ok(())
        }
        "question" => print_schema::<Question>(),
        "analysis" => print_schema::<QuestionAnalysis>(),
        "report" => print_schema::<CollectionReport>(),
        "config" => print_schema::<EngineConfig>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
