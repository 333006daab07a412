use golembase_core::data::DataType;

/// A named parameter discovered while analyzing a statement, with the type inferred
/// from the column it was compared against or inserted into.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    pub id: u32,
    pub r#type: DataType,
}

/// Assigns stable ids to named parameters in first-seen order within one statement.
#[derive(Debug, Default)]
pub struct ParamRegistry {
    names: Vec<String>,
    types: Vec<DataType>,
}

impl ParamRegistry {
    pub fn id_for(&mut self, name: &str, r#type: DataType) -> u32 {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            return pos as u32;
        }
        self.names.push(name.to_string());
        self.types.push(r#type);
        (self.names.len() - 1) as u32
    }

    pub fn finish(self) -> Vec<ParamInfo> {
        self.names
            .into_iter()
            .zip(self.types)
            .enumerate()
            .map(|(id, (name, r#type))| ParamInfo {
                name,
                id: id as u32,
                r#type,
            })
            .collect()
    }
}
