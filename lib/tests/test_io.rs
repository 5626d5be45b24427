mod common;

use std::fs;

use tdb::io::{format_for, read_file};
use tdb::Triple;
use tempfile::tempdir;

use common::*;

#[test]
fn loads_turtle_into_graph() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data.ttl");
    fs::write(
        &path,
        "@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n\
         <eh:/a> <eh:/P> \"1\"^^xsd:int ;\n\
                 <eh:/Q> [ <eh:/R> <eh:/b> ] .\n",
    )
    .unwrap();
    let g = graph();
    let rec = Recorder::attach(&g);
    assert_eq!(read_file(&path, &g).unwrap(), 3);
    assert_eq!(g.size().unwrap(), 3);
    assert!(g.contains(&triple("a P 1")).unwrap());
    assert_eq!(rec.take().len(), 3);
    assert_isomorphic(&g, "a P '1'xsd:int; a Q _x; _x R b");
}

#[test]
fn loads_ntriples_by_extension() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data.nt");
    fs::write(&path, "<eh:/a> <eh:/P> <eh:/b> .\n").unwrap();
    assert_eq!(format_for(&path), oxigraph::io::RdfFormat::NTriples);
    let g = graph();
    read_file(&path, &g).unwrap();
    assert_eq!(
        g.find(&Triple::any()).unwrap().to_vec().unwrap(),
        vec![triple("a P b")]
    );
}

#[test]
fn parse_error_leaves_graph_untouched() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.ttl");
    fs::write(&path, "<eh:/a> <eh:/P> <eh:/b> .\n<eh:/c> <eh:/P> .\n").unwrap();
    let g = graph();
    assert!(read_file(&path, &g).is_err());
    assert!(g.is_empty().unwrap());
    assert!(read_file(&dir.path().join("absent.ttl"), &g).is_err());
}
