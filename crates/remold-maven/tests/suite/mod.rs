mod graph;
mod management;
mod model;
mod reactor;
mod repositories;
mod snapshots;
mod spring_boot;
