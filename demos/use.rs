use ucl::{AvlMap, Node, NodeId};

fn main() {
    let entries = [
        (0, "zero"),
        (1, "one"),
        (2, "two"),
        (2, "deux"),
        (3, "three"),
        (4, "four"),
        (5, "five"),
    ];
    let mut nodes: Vec<Node<i32, &str>> =
        entries.into_iter().map(|(key, value)| Node::new(key, value)).collect();

    let mut map = AvlMap::new();
    for index in 0..nodes.len() {
        if !map.insert(&mut nodes, NodeId::from_index(index)) {
            println!("rejected duplicate key {}", nodes[index].key);
        }
    }
    let one = map.find(&nodes, &1).map(|id| nodes[id.to_index()].value);
    assert_eq!(one, Some("one"));
    map.remove(&mut nodes, &1);
    assert!(map.find(&nodes, &1).is_none());

    for (_, node) in map.iter(&nodes) {
        println!("{} => {}", node.key, node.value);
    }

    // The same nodes, relinked into a multimap that keeps every duplicate.
    map.clear(&mut nodes);
    let mut multi = AvlMap::multimap();
    for index in 0..nodes.len() {
        multi.insert(&mut nodes, NodeId::from_index(index));
    }
    assert_eq!(multi.count(&nodes, &2), 2);

    print!("{{ ");
    for (_, node) in multi.range(&nodes, 1..=3) {
        print!("{}, ", node.value);
    }
    println!("}}");
}
