use std::collections::HashMap;
use std::fs;
use std::str::FromStr;

use crate::error::{Result, SimulationError};

/// Reads `name: value` parameter files. The file name is the first program
/// argument.
pub struct ParameterReader
{
    file_name: String,
    names: Vec<&'static str>,
}

/// Parsed parameter values keyed by name.
#[derive(Debug, Default, Clone)]
pub struct Parameters
{
    values: HashMap<&'static str, String>,
}

impl ParameterReader
{
    pub fn build(args: &[String], names: &[&'static str]) -> Result<Self>
    {
        if args.len() < 2
        {
            return Err(SimulationError::NotEnoughArguments);
        }
        let file_name = args[1].clone();
        Ok(Self { file_name, names: names.to_vec() })
    }
    pub fn file_name(&self) -> &str
    {
        &self.file_name
    }
    pub fn parse_parameters(&self, delimiter: &str) -> Result<Parameters>
    {
        let content = fs::read_to_string(&self.file_name)?;
        build_new_map(&self.names, &content, delimiter)
    }
}

fn build_new_map(names: &[&'static str], content: &str, delimiter: &str) -> Result<Parameters>
{
    let mut values: HashMap<&'static str, String> = HashMap::new();
    for line in content.lines()
    {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#')
        {
            continue;
        }
        let Some((key, value)) = line.split_once(delimiter) else
        {
            return Err(SimulationError::BadDelimiter(line.to_owned()));
        };
        let key = key.trim();
        if let Some(name) = names.iter().find(|&&name| name == key)
        {
            values.insert(*name, value.trim().to_owned());
        }
    }
    Ok(Parameters { values })
}

impl Parameters
{
    pub fn from_content(names: &[&'static str], content: &str, delimiter: &str) -> Result<Self>
    {
        build_new_map(names, content, delimiter)
    }
    pub fn contains(&self, name: &str) -> bool
    {
        self.values.contains_key(name)
    }
    /// Required parameter.
    pub fn get<T: FromStr>(&self, name: &str) -> Result<T>
    {
        let Some(value) = self.values.get(name) else
        {
            return Err(SimulationError::MissingParameter(name.to_owned()));
        };
        parse_value(name, value)
    }
    /// Optional parameter falling back to `default`.
    pub fn get_or<T: FromStr>(&self, name: &str, default: T) -> Result<T>
    {
        if self.contains(name) { self.get(name) } else { Ok(default) }
    }
    /// Comma separated list, `default` when the parameter is absent.
    pub fn get_list_or<T: FromStr>(&self, name: &str, default: Vec<T>) -> Result<Vec<T>>
    {
        match self.values.get(name)
        {
            Some(value) => value.split(',').map(|item| parse_value(name, item.trim())).collect(),
            None        => Ok(default),
        }
    }
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T>
{
    // booleans are accepted in any case, like "True"
    let lowered = value.to_lowercase();
    let value   = if lowered == "true" || lowered == "false" { lowered.as_str() } else { value };
    value.parse().map_err(|_| SimulationError::BadValue { name: name.to_owned(), value: value.to_owned() })
}
