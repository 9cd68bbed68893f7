fn main() {
    courier_frontend::start();
}
