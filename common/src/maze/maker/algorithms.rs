pub mod backtrack;
pub mod kruskal;
