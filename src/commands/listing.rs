use super::CommandResult;
use crate::database::ResultsDatabase;
use crate::results::ResultsEngine;

pub async fn departments(db: ResultsDatabase) -> CommandResult<()> {
    print_names(&ResultsEngine::new(db).departments().await?);
    Ok(())
}

pub async fn municipalities(db: ResultsDatabase, department: &str) -> CommandResult<()> {
    print_names(&ResultsEngine::new(db).municipalities(department).await?);
    Ok(())
}

pub async fn parties(db: ResultsDatabase) -> CommandResult<()> {
    print_names(&ResultsEngine::new(db).parties().await?);
    Ok(())
}

fn print_names(names: &[String]) {
    for name in names {
        println!("{}", name);
    }
}
