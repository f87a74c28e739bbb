use ucl::{AvlMap, Direction, Node, NodeId, Order};

fn main() {
    let mut nodes: Vec<Node<i32, String>> =
        (1..=6).map(|key| Node::new(key, key.to_string())).collect();
    let mut map = AvlMap::new();
    for index in 0..nodes.len() {
        map.insert(&mut nodes, NodeId::from_index(index));
    }

    println!("Level-order traversal:");
    for id in map.walk(&nodes, Order::Levelorder, Direction::Forward) {
        let node = &nodes[id.to_index()];
        println!("Key: {}, Value: {}", node.key, node.value);
    }

    println!("Level-order traversal, backward:");
    for id in map.walk(&nodes, Order::Levelorder, Direction::Backward) {
        println!("Key: {}", nodes[id.to_index()].key);
    }
}
