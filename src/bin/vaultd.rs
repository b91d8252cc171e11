#[macro_use]
extern crate slog_global;

use std::sync::Arc;

use clap::{App, Arg};

use storage::MemEngine;
use vault::server::Server;
use vault::setup::init_logger;
use vsync::conf::VaultConf;

#[tokio::main]
async fn main() {
    // TODO add test of command line argument.
    let matches = App::new("vaultd")
        .version("0.0.1")
        .author("vaultdb contributors")
        .about("distributed version vault")
        .arg(
            Arg::with_name("cluster")
                .long("cluster")
                .takes_value(true)
                .required(true)
                .help("cluster config in yaml"),
        )
        .arg(
            Arg::with_name("id")
                .long("id")
                .takes_value(true)
                .required(true)
                .help("node name of this vault. It must be one key of conf.nodes"),
        )
        .get_matches();

    let conffn = matches.value_of("cluster").unwrap();
    let node_name = matches.value_of("id").unwrap();

    init_logger().unwrap();

    let conf = VaultConf::from_file(conffn).unwrap();
    if conf.get(node_name).is_none() {
        panic!("node name {} is not a key of conf.nodes", node_name);
    }

    let sto = MemEngine::new().unwrap();

    let mut server = Server::new(Arc::new(sto), &conf, node_name);
    server.start();

    info!("vaultd started";
          "node" => node_name,
          "group_size" => conf.group_size(),
          "quorum" => conf.quorum_threshold(),
    );

    server.join().await.unwrap();
}
