// Import the client object.
use statsd_client::Client;

fn main() {
    let client = Client::new("127.0.0.1", 8125);
    client.increment("some.metric");
    client.sampled_increment(["some.metric", "other.metric"], 0.5);
    client.timing("some.duration", 350.0);
    println!("Sent some metrics!");
}
