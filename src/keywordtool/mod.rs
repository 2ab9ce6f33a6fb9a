// KeywordTool: Google search volume per keyword.
//
// The client posts keyword batches; `parse` flattens the several response
// shapes the API is known to return; `aggregate` folds variant rows back
// onto canonical brands.

pub mod aggregate;
pub mod client;
pub mod parse;
